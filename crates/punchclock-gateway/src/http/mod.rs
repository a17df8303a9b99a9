pub mod diagnostics;
pub mod shutdown;
pub mod status;
pub mod sync;
