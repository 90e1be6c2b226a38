// ABOUTME: Decoder configuration: OTA indicator values and user data bounds
// ABOUTME: Plain struct with defaults and chained with_* setters

/// Protocol identifiers that mark SIM data download / OTA traffic
pub const DEFAULT_OTA_PROTOCOL_IDS: [u8; 2] = [124, 127];

/// Data coding schemes seen on OTA traffic (class 2 8-bit data)
pub const DEFAULT_OTA_CODING_SCHEMES: [u8; 2] = [22, 246];

/// GSM 03.40 ceiling for TP-User-Data in octets
pub const DEFAULT_MAX_USER_DATA: usize = 140;

/// Configuration for the SMS decoder
///
/// # Example
///
/// ```rust
/// use smsmeta::DecoderConfig;
///
/// // Default configuration (PID 124/127, DCS 22/246, 140 octets)
/// let config = DecoderConfig::default();
/// assert!(config.is_ota_indicator(127, 0x00));
///
/// // Also treat PID 0x7D as OTA
/// let config = DecoderConfig::default().with_ota_protocol_id(0x7D);
/// assert!(config.is_ota_indicator(0x7D, 0x00));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    /// TP-PID values that flag 8-bit user data as an OTA envelope
    pub ota_protocol_ids: Vec<u8>,

    /// TP-DCS values that flag 8-bit user data as an OTA envelope
    pub ota_coding_schemes: Vec<u8>,

    /// Capacity of the raw user data kept per message, in octets.
    ///
    /// User data longer than this rejects the message instead of being
    /// truncated.
    pub max_user_data: usize,

    /// Upper bound on septets handed to the 7-bit text unpacker
    pub max_text_septets: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            ota_protocol_ids: DEFAULT_OTA_PROTOCOL_IDS.to_vec(),
            ota_coding_schemes: DEFAULT_OTA_CODING_SCHEMES.to_vec(),
            max_user_data: DEFAULT_MAX_USER_DATA,
            max_text_septets: 255,
        }
    }
}

impl DecoderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the OTA protocol identifier set
    pub fn with_ota_protocol_ids(mut self, ids: impl IntoIterator<Item = u8>) -> Self {
        self.ota_protocol_ids = ids.into_iter().collect();
        self
    }

    /// Add one OTA protocol identifier
    pub fn with_ota_protocol_id(mut self, id: u8) -> Self {
        if !self.ota_protocol_ids.contains(&id) {
            self.ota_protocol_ids.push(id);
        }
        self
    }

    /// Replace the OTA data coding scheme set
    pub fn with_ota_coding_schemes(mut self, schemes: impl IntoIterator<Item = u8>) -> Self {
        self.ota_coding_schemes = schemes.into_iter().collect();
        self
    }

    pub fn with_max_user_data(mut self, max_user_data: usize) -> Self {
        self.max_user_data = max_user_data;
        self
    }

    pub fn with_max_text_septets(mut self, max_text_septets: usize) -> Self {
        self.max_text_septets = max_text_septets;
        self
    }

    /// Whether a PID/DCS pair marks 8-bit data as OTA
    pub fn is_ota_indicator(&self, protocol_id: u8, dcs: u8) -> bool {
        self.ota_protocol_ids.contains(&protocol_id) || self.ota_coding_schemes.contains(&dcs)
    }
}
