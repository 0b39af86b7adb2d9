mod bail;
mod shutdown;

pub mod prelude {
    pub use crate::bail::IterationBailError;
    pub use crate::shutdown::{DelegatedShutdownListener, ShutdownHandle, ShutdownSignalError};
}
