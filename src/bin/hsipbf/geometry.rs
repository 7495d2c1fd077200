//! Runtime (bits, k) -> compile-time `<M, K>` dispatch.
//!
//! Filter geometry is a pair of const generics, so the CLI instantiates a fixed
//! table: M in `consts::SUPPORTED_FILTER_BITS`, K in 1..=`consts::MAX_CLI_SLOTS`.
//!
//! Usage: `dispatch_geometry!(bits, k, func(arg1, arg2))` calls `func::<M, K>(arg1, arg2)`,
//! which must return `anyhow::Result<_>`.

macro_rules! dispatch_geometry {
    (@bits $bits:expr, $k:expr, $f:ident, $args:tt; $($m:literal),+) => {
        match $bits {
            $( $m => dispatch_geometry!(@k $m, $k, $f, $args), )+
            other => Err(anyhow::anyhow!(
                "unsupported filter size {} bits (supported: {:?})",
                other,
                hsipbf::consts::SUPPORTED_FILTER_BITS
            )),
        }
    };
    (@k $m:literal, $k:expr, $f:ident, ($($arg:expr),*)) => {
        match $k {
            1 => $f::<$m, 1>($($arg),*),
            2 => $f::<$m, 2>($($arg),*),
            3 => $f::<$m, 3>($($arg),*),
            4 => $f::<$m, 4>($($arg),*),
            5 => $f::<$m, 5>($($arg),*),
            6 => $f::<$m, 6>($($arg),*),
            7 => $f::<$m, 7>($($arg),*),
            8 => $f::<$m, 8>($($arg),*),
            other => Err(anyhow::anyhow!(
                "unsupported number of keys {} (1..={})",
                other,
                hsipbf::consts::MAX_CLI_SLOTS
            )),
        }
    };
    ($bits:expr, $k:expr, $f:ident ( $($arg:expr),* $(,)? )) => {
        dispatch_geometry!(@bits $bits, $k, $f, ($($arg),*);
            256, 1024, 4096, 16384, 65536, 262144, 1048576)
    };
}
