use std::fmt;

use super::abi::{self, AbiError, Decoder, Token};
use super::constants::{ABI_WORD_SIZE, CROWDFUND_CONTRACT_ADDRESS};
use super::rpc::{RpcConnection, RpcError};
use super::units::{format_ether, parse_ether, UnitError};
use super::wallet::{MetamaskWallet, TxRequest, WalletError};

/// Crowdfunding contract configuration and call constants
pub struct CrowdfundContract;

impl CrowdfundContract {
    /// Deployed contract address
    pub fn address() -> &'static str {
        CROWDFUND_CONTRACT_ADDRESS
    }

    /// Get createCampaign function selector
    pub fn create_campaign_selector() -> [u8; 4] {
        abi::selector("createCampaign(address,string,string,uint256,uint256,string)")
    }

    /// Get getCampaigns function selector
    pub fn get_campaigns_selector() -> [u8; 4] {
        abi::selector("getCampaigns()")
    }

    /// Get getDonators function selector
    pub fn get_donators_selector() -> [u8; 4] {
        abi::selector("getDonators(uint256)")
    }

    /// Get donateToCampaign function selector
    pub fn donate_selector() -> [u8; 4] {
        abi::selector("donateToCampaign(uint256)")
    }
}

/// One campaign record as stored on-chain, tagged with its positional
/// index (the id every other contract call keys on).
#[derive(Debug, Clone, PartialEq)]
pub struct Campaign {
    pub id: u64,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub target_wei: u128,
    pub deadline: u64,
    pub amount_collected_wei: u128,
    pub image: String,
}

impl Campaign {
    pub fn target_eth(&self) -> String {
        format_ether(self.target_wei)
    }

    pub fn collected_eth(&self) -> String {
        format_ether(self.amount_collected_wei)
    }
}

/// A single donation to one campaign.
#[derive(Debug, Clone, PartialEq)]
pub struct Donation {
    pub donor: String,
    pub amount_wei: u128,
}

impl Donation {
    pub fn amount_eth(&self) -> String {
        format_ether(self.amount_wei)
    }
}

/// Raw create-campaign form state, exactly as typed. The form also asks
/// for the creator's display name, but the contract call does not take it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CampaignDraft {
    pub title: String,
    pub description: String,
    pub target: String,
    pub deadline: String,
    pub image: String,
}

/// A draft that passed local validation, with amounts and times already
/// in the contract's units.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedDraft {
    pub title: String,
    pub description: String,
    pub target_wei: u128,
    pub deadline_secs: u64,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    InvalidTarget(String),
    InvalidDeadline(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidTarget(_) => {
                write!(f, "Please enter a target greater than 0 ETH.")
            }
            ValidationError::InvalidDeadline(_) => write!(f, "Please pick a valid date."),
        }
    }
}

impl CampaignDraft {
    /// Parse the goal field into wei, rejecting anything that is not a
    /// positive decimal amount.
    pub fn parse_target(&self) -> Result<u128, ValidationError> {
        let wei = parse_ether(&self.target)
            .map_err(|_| ValidationError::InvalidTarget(self.target.clone()))?;
        if wei == 0 {
            return Err(ValidationError::InvalidTarget(self.target.clone()));
        }
        Ok(wei)
    }

    /// Validate the whole draft before anything touches the network.
    /// The image URL is probed separately (it needs an async load).
    pub fn validate(&self) -> Result<ValidatedDraft, ValidationError> {
        let target_wei = self.parse_target()?;

        let deadline_ms = js_sys::Date::parse(&self.deadline);
        if deadline_ms.is_nan() {
            return Err(ValidationError::InvalidDeadline(self.deadline.clone()));
        }

        Ok(ValidatedDraft {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            target_wei,
            deadline_secs: (deadline_ms / 1000.0).floor() as u64,
            image: self.image.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub enum ClientError {
    NotConnected,
    Wallet(WalletError),
    Rpc(RpcError),
    Abi(AbiError),
    InvalidAmount(UnitError),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::NotConnected => write!(f, "No wallet connected"),
            ClientError::Wallet(e) => write!(f, "{}", e),
            ClientError::Rpc(e) => write!(f, "{}", e),
            ClientError::Abi(e) => write!(f, "{}", e),
            ClientError::InvalidAmount(e) => write!(f, "{}", e),
        }
    }
}

impl From<WalletError> for ClientError {
    fn from(e: WalletError) -> Self {
        ClientError::Wallet(e)
    }
}

impl From<RpcError> for ClientError {
    fn from(e: RpcError) -> Self {
        ClientError::Rpc(e)
    }
}

impl From<AbiError> for ClientError {
    fn from(e: AbiError) -> Self {
        ClientError::Abi(e)
    }
}

/// The client-side service for the crowdfunding contract.
///
/// Constructed once at startup and passed explicitly to whichever page
/// needs it; pages mutate the connected address through the signal that
/// carries the client.
#[derive(Clone)]
pub struct CampaignClient {
    rpc: RpcConnection,
    contract: String,
    address: Option<String>,
}

impl CampaignClient {
    pub fn new() -> Self {
        Self {
            rpc: RpcConnection::new(),
            contract: CrowdfundContract::address().to_string(),
            address: None,
        }
    }

    /// The connected wallet address, if any.
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Prompt the wallet for account access, make sure it is on the right
    /// chain, and remember the address.
    pub async fn connect(&mut self) -> Result<String, ClientError> {
        if !MetamaskWallet::is_installed() {
            return Err(ClientError::Wallet(WalletError::NotInstalled));
        }
        let address = MetamaskWallet::connect().await?;
        MetamaskWallet::ensure_chain().await?;
        log::info!("Wallet connected: {}", address);
        self.address = Some(address.clone());
        Ok(address)
    }

    /// Adopt an address this origin is already authorized for, without
    /// prompting. Used on startup so a reload keeps the session.
    pub async fn try_restore(&mut self) -> Option<String> {
        match MetamaskWallet::accounts().await {
            Ok(accounts) => accounts.into_iter().next().map(|address| {
                log::info!("Restored wallet session: {}", address);
                self.address = Some(address.clone());
                address
            }),
            Err(e) => {
                log::debug!("No wallet session to restore: {}", e);
                None
            }
        }
    }

    /// Submit a new campaign.
    ///
    /// # Returns
    /// The transaction hash on success.
    pub async fn create_campaign(&self, draft: &ValidatedDraft) -> Result<String, ClientError> {
        let owner = self.address.as_deref().ok_or(ClientError::NotConnected)?;
        let owner_bytes = abi::parse_address(owner)?;

        let calldata = abi::encode_call(
            CrowdfundContract::create_campaign_selector(),
            &[
                Token::Address(owner_bytes),
                Token::Str(draft.title.clone()),
                Token::Str(draft.description.clone()),
                Token::Uint(draft.target_wei),
                Token::Uint(draft.deadline_secs as u128),
                Token::Str(draft.image.clone()),
            ],
        );

        let tx = TxRequest {
            from: owner.to_string(),
            to: self.contract.clone(),
            data: abi::encode_hex(&calldata),
            value: None,
        };
        let hash = MetamaskWallet::send_transaction(&tx).await?;
        log::info!("Campaign created, tx {}", hash);
        Ok(hash)
    }

    /// Read every campaign the contract holds.
    pub async fn get_campaigns(&self) -> Result<Vec<Campaign>, ClientError> {
        let calldata = abi::encode_call(CrowdfundContract::get_campaigns_selector(), &[]);
        let data = self.rpc.eth_call(&self.contract, &calldata).await?;
        let campaigns = decode_campaigns(&data)?;
        log::debug!("Fetched {} campaigns", campaigns.len());
        Ok(campaigns)
    }

    /// Campaigns owned by the connected address.
    pub async fn get_user_campaigns(&self) -> Result<Vec<Campaign>, ClientError> {
        let owner = self
            .address
            .clone()
            .ok_or(ClientError::NotConnected)?;
        let campaigns = self.get_campaigns().await?;
        Ok(filter_by_owner(campaigns, &owner))
    }

    /// Donate `amount_eth` (a decimal display string) to a campaign.
    ///
    /// # Returns
    /// The transaction hash on success.
    pub async fn donate(&self, campaign_id: u64, amount_eth: &str) -> Result<String, ClientError> {
        let from = self.address.as_deref().ok_or(ClientError::NotConnected)?;
        let value_wei = parse_ether(amount_eth).map_err(ClientError::InvalidAmount)?;

        let calldata = abi::encode_call(
            CrowdfundContract::donate_selector(),
            &[Token::Uint(campaign_id as u128)],
        );

        let tx = TxRequest {
            from: from.to_string(),
            to: self.contract.clone(),
            data: abi::encode_hex(&calldata),
            value: Some(format!("0x{:x}", value_wei)),
        };
        let hash = MetamaskWallet::send_transaction(&tx).await?;
        log::info!("Donated {} ETH to campaign {}, tx {}", amount_eth, campaign_id, hash);
        Ok(hash)
    }

    /// Donations for one campaign, in the order the contract returns them.
    pub async fn get_donations(&self, campaign_id: u64) -> Result<Vec<Donation>, ClientError> {
        let calldata = abi::encode_call(
            CrowdfundContract::get_donators_selector(),
            &[Token::Uint(campaign_id as u128)],
        );
        let data = self.rpc.eth_call(&self.contract, &calldata).await?;
        Ok(decode_donations(&data)?)
    }

    /// Wei balance of the connected account, for the navbar readout.
    pub async fn get_balance(&self) -> Result<u128, ClientError> {
        let address = self.address.as_deref().ok_or(ClientError::NotConnected)?;
        Ok(self.rpc.get_balance(address).await?)
    }
}

impl Default for CampaignClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode the `getCampaigns()` return payload: a dynamic array of
/// `(address, string, string, uint256, uint256, uint256, string)` records.
pub fn decode_campaigns(data: &[u8]) -> Result<Vec<Campaign>, AbiError> {
    let dec = Decoder::new(data);
    let array_pos = dec.offset_at(0, 0)?;
    let (len, elements) = dec.array_at(array_pos)?;

    let mut campaigns = Vec::with_capacity(len);
    for i in 0..len {
        // dynamic tuples sit behind per-element offsets, relative to the
        // start of the element block
        let tuple = dec.offset_at(elements + i * ABI_WORD_SIZE, elements)?;
        campaigns.push(Campaign {
            id: i as u64,
            owner: dec.address_at(tuple)?,
            title: dec.string_at(dec.offset_at(tuple + ABI_WORD_SIZE, tuple)?)?,
            description: dec.string_at(dec.offset_at(tuple + 2 * ABI_WORD_SIZE, tuple)?)?,
            target_wei: dec.uint_at(tuple + 3 * ABI_WORD_SIZE)?,
            deadline: dec.u64_at(tuple + 4 * ABI_WORD_SIZE)?,
            amount_collected_wei: dec.uint_at(tuple + 5 * ABI_WORD_SIZE)?,
            image: dec.string_at(dec.offset_at(tuple + 6 * ABI_WORD_SIZE, tuple)?)?,
        });
    }
    Ok(campaigns)
}

/// Decode the `getDonators(id)` return payload: parallel `address[]` and
/// `uint256[]` arrays, zipped in contract order.
pub fn decode_donations(data: &[u8]) -> Result<Vec<Donation>, AbiError> {
    let dec = Decoder::new(data);
    let donors_pos = dec.offset_at(0, 0)?;
    let amounts_pos = dec.offset_at(ABI_WORD_SIZE, 0)?;

    let (donor_count, donors) = dec.array_at(donors_pos)?;
    let (amount_count, amounts) = dec.array_at(amounts_pos)?;
    if donor_count != amount_count {
        return Err(AbiError::LengthMismatch(format!(
            "{} donors vs {} amounts",
            donor_count, amount_count
        )));
    }

    let mut donations = Vec::with_capacity(donor_count);
    for i in 0..donor_count {
        donations.push(Donation {
            donor: dec.address_at(donors + i * ABI_WORD_SIZE)?,
            amount_wei: dec.uint_at(amounts + i * ABI_WORD_SIZE)?,
        });
    }
    Ok(donations)
}

/// Campaigns owned by `owner` (hex addresses compare case-insensitively).
pub fn filter_by_owner(campaigns: Vec<Campaign>, owner: &str) -> Vec<Campaign> {
    campaigns
        .into_iter()
        .filter(|c| c.owner.eq_ignore_ascii_case(owner))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uint_word(value: u128) -> Vec<u8> {
        let mut word = vec![0u8; 32];
        word[16..].copy_from_slice(&value.to_be_bytes());
        word
    }

    fn address_word(hex40: &str) -> Vec<u8> {
        let mut word = vec![0u8; 12];
        word.extend_from_slice(&abi::parse_address(hex40).unwrap());
        word
    }

    /// Tuple-encode one campaign record by reusing the call encoder
    /// (a call body is exactly a tuple encoding).
    fn encode_campaign_tuple(
        owner: &str,
        title: &str,
        description: &str,
        target: u128,
        deadline: u128,
        collected: u128,
        image: &str,
    ) -> Vec<u8> {
        let call = abi::encode_call(
            [0u8; 4],
            &[
                Token::Address(abi::parse_address(owner).unwrap()),
                Token::Str(title.to_string()),
                Token::Str(description.to_string()),
                Token::Uint(target),
                Token::Uint(deadline),
                Token::Uint(collected),
                Token::Str(image.to_string()),
            ],
        );
        call[4..].to_vec()
    }

    fn encode_campaigns_return(tuples: &[Vec<u8>]) -> Vec<u8> {
        let mut out = uint_word(32); // offset to the array
        out.extend_from_slice(&uint_word(tuples.len() as u128));

        // per-element offsets, relative to the element block
        let mut offset = tuples.len() * 32;
        for tuple in tuples {
            out.extend_from_slice(&uint_word(offset as u128));
            offset += tuple.len();
        }
        for tuple in tuples {
            out.extend_from_slice(tuple);
        }
        out
    }

    const ALICE: &str = "0x00000000000000000000000000000000000000a1";
    const BOB: &str = "0x00000000000000000000000000000000000000b2";

    #[test]
    fn decodes_a_campaign_array() {
        let tuples = vec![
            encode_campaign_tuple(
                ALICE,
                "Clean water",
                "Wells for the village",
                2_000_000_000_000_000_000,
                1_760_000_000,
                500_000_000_000_000_000,
                "https://example.com/water.png",
            ),
            encode_campaign_tuple(
                BOB,
                "Library",
                "",
                1_000_000_000_000_000_000,
                1_770_000_000,
                0,
                "https://example.com/library.png",
            ),
        ];
        let data = encode_campaigns_return(&tuples);

        let campaigns = decode_campaigns(&data).unwrap();
        assert_eq!(campaigns.len(), 2);

        assert_eq!(campaigns[0].id, 0);
        assert_eq!(campaigns[0].owner, ALICE);
        assert_eq!(campaigns[0].title, "Clean water");
        assert_eq!(campaigns[0].description, "Wells for the village");
        assert_eq!(campaigns[0].target_wei, 2_000_000_000_000_000_000);
        assert_eq!(campaigns[0].deadline, 1_760_000_000);
        assert_eq!(campaigns[0].amount_collected_wei, 500_000_000_000_000_000);
        assert_eq!(campaigns[0].target_eth(), "2.0");
        assert_eq!(campaigns[0].collected_eth(), "0.5");

        assert_eq!(campaigns[1].id, 1);
        assert_eq!(campaigns[1].owner, BOB);
        assert_eq!(campaigns[1].description, "");
        assert_eq!(campaigns[1].image, "https://example.com/library.png");
    }

    #[test]
    fn decodes_an_empty_campaign_array() {
        let data = encode_campaigns_return(&[]);
        assert_eq!(decode_campaigns(&data).unwrap(), vec![]);
    }

    #[test]
    fn campaign_amounts_round_trip_to_chain_units() {
        let collected = 123_456_789_000_000_000u128;
        let tuple = encode_campaign_tuple(ALICE, "t", "d", 1, 1, collected, "i");
        let campaigns = decode_campaigns(&encode_campaigns_return(&[tuple])).unwrap();
        // the display string converts back to the exact on-chain integer
        assert_eq!(
            crate::core::units::parse_ether(&campaigns[0].collected_eth()),
            Ok(collected)
        );
    }

    #[test]
    fn rejects_truncated_campaign_payloads() {
        let tuple = encode_campaign_tuple(ALICE, "t", "d", 1, 1, 1, "i");
        let mut data = encode_campaigns_return(&[tuple]);
        data.truncate(data.len() - 40);
        assert!(decode_campaigns(&data).is_err());
    }

    fn encode_donations_return(donors: &[&str], amounts: &[u128]) -> Vec<u8> {
        let mut out = uint_word(64); // offset to address[]
        out.extend_from_slice(&uint_word((64 + 32 + donors.len() * 32) as u128));
        out.extend_from_slice(&uint_word(donors.len() as u128));
        for donor in donors {
            out.extend_from_slice(&address_word(donor));
        }
        out.extend_from_slice(&uint_word(amounts.len() as u128));
        for &amount in amounts {
            out.extend_from_slice(&uint_word(amount));
        }
        out
    }

    #[test]
    fn zips_donors_with_amounts_in_order() {
        let data = encode_donations_return(&[ALICE, BOB], &[100, 250]);
        let donations = decode_donations(&data).unwrap();
        assert_eq!(
            donations,
            vec![
                Donation { donor: ALICE.to_string(), amount_wei: 100 },
                Donation { donor: BOB.to_string(), amount_wei: 250 },
            ]
        );
    }

    #[test]
    fn mismatched_parallel_arrays_are_an_error() {
        let data = encode_donations_return(&[ALICE, BOB], &[100]);
        assert!(matches!(
            decode_donations(&data),
            Err(AbiError::LengthMismatch(_))
        ));
    }

    #[test]
    fn filters_campaigns_by_owner_exactly() {
        let mk = |id: u64, owner: &str| Campaign {
            id,
            owner: owner.to_string(),
            title: String::new(),
            description: String::new(),
            target_wei: 1,
            deadline: 1,
            amount_collected_wei: 0,
            image: String::new(),
        };
        let all = vec![mk(0, ALICE), mk(1, BOB), mk(2, ALICE)];

        // checksummed input must still match the lowercase decoded form
        let mine = filter_by_owner(all.clone(), "0x00000000000000000000000000000000000000A1");
        assert_eq!(mine.iter().map(|c| c.id).collect::<Vec<_>>(), vec![0, 2]);
        for c in &mine {
            assert!(all.contains(c));
        }

        assert!(filter_by_owner(all, "0x00000000000000000000000000000000000000c3").is_empty());
    }

    #[test]
    fn draft_target_validation_blocks_bad_input() {
        let draft = |target: &str| CampaignDraft {
            target: target.to_string(),
            ..Default::default()
        };
        assert!(draft("-5").parse_target().is_err());
        assert!(draft("abc").parse_target().is_err());
        assert!(draft("0").parse_target().is_err());
        assert!(draft("").parse_target().is_err());
        assert_eq!(draft("0.5").parse_target(), Ok(500_000_000_000_000_000));
    }
}
