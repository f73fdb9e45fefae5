//! Default values for econet configuration.
//!
//! All hardcoded defaults are centralized here for easy maintenance.

// ============================================================================
// Roster Defaults
// ============================================================================

/// Default roster file (the park's species list export).
pub const DEFAULT_ROSTER_PATH: &str = "Data-Files/Species Full List with Details.csv";

/// Zero-based column holding the scientific name in the roster CSV.
pub const DEFAULT_NAME_COLUMN: usize = 3;

/// Number of leading rows (title block and column headers) to skip.
pub const DEFAULT_HEADER_ROWS: usize = 5;

// ============================================================================
// Interaction API Defaults
// ============================================================================

/// Base URL of the Global Biotic Interactions API.
pub const DEFAULT_GLOBI_URL: &str = "https://api.globalbioticinteractions.org";

// ============================================================================
// Metadata API Defaults
// ============================================================================

/// Base URL of the iNaturalist API.
pub const DEFAULT_INAT_URL: &str = "https://api.inaturalist.org";

/// Minimum spacing between metadata requests (the service allows 1 req/s).
pub const DEFAULT_METADATA_INTERVAL_MS: u64 = 1000;

/// Environment variable consulted for the iNaturalist API token.
pub const DEFAULT_TOKEN_ENV: &str = "ECONET_INAT_TOKEN";

// ============================================================================
// HTTP Defaults
// ============================================================================

/// Per-request timeout for all outbound HTTP calls.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// User agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = concat!("econet/", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Graph Defaults
// ============================================================================

/// Category assigned when the taxonomy service has nothing to say.
pub const UNKNOWN_CATEGORY: &str = "unknown";

// ============================================================================
// Config File Locations
// ============================================================================

/// Project-local config file name.
pub const LOCAL_CONFIG_FILE: &str = "econet.toml";

/// Directory under the user config dir holding `config.toml`.
pub const USER_CONFIG_DIR: &str = "econet";
