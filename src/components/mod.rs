mod button;
mod count_box;
mod form_field;
mod fund_card;
mod loader;
mod navbar;
mod sidebar;

pub use button::CustomButton;
pub use count_box::CountBox;
pub use form_field::FormField;
pub use fund_card::FundCard;
pub use loader::Loader;
pub use navbar::Navbar;
pub use sidebar::Sidebar;
