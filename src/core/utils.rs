use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Date;
use tokio::sync::oneshot;
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::HtmlImageElement;

const MS_PER_DAY: f64 = 1000.0 * 3600.0 * 24.0;

/// Whole days between `now_ms` and `deadline_ms`, rounded to nearest,
/// floored at zero. Returned as the display string the cards render.
pub fn days_left_at(deadline_ms: f64, now_ms: f64) -> String {
    let difference = deadline_ms - now_ms;
    if difference <= 0.0 {
        return "0".to_string();
    }
    ((difference / MS_PER_DAY).round() as u64).to_string()
}

/// Days remaining until a unix-seconds deadline.
pub fn days_left(deadline_secs: u64) -> String {
    days_left_at(deadline_secs as f64 * 1000.0, Date::now())
}

/// Funding progress as a nearest-integer percentage.
///
/// Caller must guarantee `goal > 0` (the contract rejects zero targets at
/// creation, so every stored campaign satisfies this).
pub fn calculate_bar_percentage(goal: u128, raised: u128) -> u32 {
    let percentage = (raised * 100 + goal / 2) / goal;
    u32::try_from(percentage).unwrap_or(u32::MAX)
}

/// Shorten a hex address for display: "0x1234...cdef".
pub fn truncate_address(address: &str) -> String {
    if address.len() <= 10 {
        return address.to_string();
    }
    format!("{}...{}", &address[..6], &address[address.len() - 4..])
}

/// Probe whether `url` loads as an image.
///
/// Resolves exactly once: an already-cached image can report completion
/// synchronously and still fire its load event afterwards, so the result
/// goes through a oneshot channel and only the first signal counts.
pub async fn check_image(url: &str) -> bool {
    let img = match HtmlImageElement::new() {
        Ok(img) => img,
        Err(e) => {
            log::error!("Failed to create image element: {:?}", e);
            return false;
        }
    };

    let (tx, rx) = oneshot::channel::<bool>();
    let tx = Rc::new(RefCell::new(Some(tx)));

    let tx_load = Rc::clone(&tx);
    let onload = Closure::wrap(Box::new(move || {
        if let Some(tx) = tx_load.borrow_mut().take() {
            let _ = tx.send(true);
        }
    }) as Box<dyn FnMut()>);

    let tx_error = Rc::clone(&tx);
    let onerror = Closure::wrap(Box::new(move || {
        if let Some(tx) = tx_error.borrow_mut().take() {
            let _ = tx.send(false);
        }
    }) as Box<dyn FnMut()>);

    img.set_onload(Some(onload.as_ref().unchecked_ref()));
    img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
    img.set_src(url);

    // cached images can be complete before the handlers are attached
    if img.complete() {
        if let Some(tx) = tx.borrow_mut().take() {
            let _ = tx.send(true);
        }
    }

    onload.forget();
    onerror.forget();

    rx.await.unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: f64 = 24.0 * 3600.0 * 1000.0;

    #[test]
    fn counts_whole_days_ahead() {
        assert_eq!(days_left_at(3.0 * DAY_MS, 0.0), "3");
        assert_eq!(days_left_at(10.0 * DAY_MS, 7.0 * DAY_MS), "3");
    }

    #[test]
    fn never_goes_negative() {
        assert_eq!(days_left_at(0.0, 5.0 * DAY_MS), "0");
        assert_eq!(days_left_at(DAY_MS, DAY_MS), "0");
    }

    #[test]
    fn rounds_partial_days_to_nearest() {
        assert_eq!(days_left_at(2.6 * DAY_MS, 0.0), "3");
        assert_eq!(days_left_at(2.4 * DAY_MS, 0.0), "2");
        // positive but under half a day shows as zero
        assert_eq!(days_left_at(0.4 * DAY_MS, 0.0), "0");
    }

    #[test]
    fn truncates_long_addresses_only() {
        assert_eq!(
            truncate_address("0x00000000000000000000000000000000000000a1"),
            "0x0000...00a1"
        );
        assert_eq!(truncate_address("0x1234"), "0x1234");
    }

    #[test]
    fn percentage_matches_display_expectations() {
        assert_eq!(calculate_bar_percentage(100, 25), 25);
        assert_eq!(calculate_bar_percentage(100, 0), 0);
        assert_eq!(calculate_bar_percentage(100, 100), 100);
        // overfunded campaigns can exceed 100
        assert_eq!(calculate_bar_percentage(100, 250), 250);
        // wei-scale values
        assert_eq!(
            calculate_bar_percentage(2_000_000_000_000_000_000, 500_000_000_000_000_000),
            25
        );
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod browser_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    // 1x1 transparent PNG
    const PNG_DATA_URL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8BQDwAEhQGAhKmMIQAAAABJRU5ErkJggg==";

    #[wasm_bindgen_test]
    async fn reports_true_for_a_loadable_image() {
        assert!(check_image(PNG_DATA_URL).await);
    }

    #[wasm_bindgen_test]
    async fn reports_true_again_for_a_cached_image() {
        // second load may complete synchronously from cache; the probe
        // must still resolve exactly once
        assert!(check_image(PNG_DATA_URL).await);
        assert!(check_image(PNG_DATA_URL).await);
    }

    #[wasm_bindgen_test]
    async fn reports_false_for_a_bad_url() {
        assert!(!check_image("data:image/png;base64,not-an-image").await);
    }
}
