//! Construction constants (HalfSipHash personalization, finalization, presets).

// -------- HalfSipHash init --------
// "lyge" / "tedb": XORed into v2 / v3 at init (32-bit halves of the SipHash words).
pub const HSIP_INIT_V2: u32 = 0x6c79_6765;
pub const HSIP_INIT_V3: u32 = 0x7465_6462;

// -------- HalfSipHash finalization --------
// XORed into v2 before the finalization rounds (32-bit tag variant).
pub const HSIP_FINAL_V2: u32 = 0xff;

// Block size in bytes (one LE u32 word per compression step).
pub const HSIP_BLOCK_LEN: usize = 4;

// Key size in bytes (two LE u32 words).
pub const HSIP_KEY_LEN: usize = 8;

// -------- Presets (compression rounds, finalization rounds) --------
pub const SIP24_C_ROUNDS: usize = 2;
pub const SIP24_D_ROUNDS: usize = 4;
pub const SIP13_C_ROUNDS: usize = 1;
pub const SIP13_D_ROUNDS: usize = 3;

// -------- Filter defaults (CLI / config) --------
pub const DEFAULT_FILTER_BITS: usize = 1024;

// Geometries the CLI can instantiate (M must be a compile-time constant).
pub const SUPPORTED_FILTER_BITS: &[usize] = &[256, 1024, 4096, 16384, 65536, 262144, 1048576];
pub const MAX_CLI_SLOTS: usize = 8;

// -------- ENV --------
pub const ENV_HASH: &str = "HSIPBF_HASH";
pub const ENV_BITS: &str = "HSIPBF_BITS";
pub const ENV_KEYS_HEX: &str = "HSIPBF_KEYS_HEX";
pub const ENV_KEYS_BASE64: &str = "HSIPBF_KEYS_BASE64";
