mod cli;
mod config;
mod context;
mod executor;
mod init;
mod progress;
mod run;
mod schedule;
mod shutdown;
mod types;

pub mod prelude {
    pub use crate::cli::GustScenarioCli;
    pub use crate::config::{
        Executor, RunConfigBuilder, Scenario, SetupFn, Stage, VuBehaviour,
    };
    pub use crate::context::{RunnerContext, SharedValuesConstraint, VuContext};
    pub use crate::init::init;
    pub use crate::run::run;
    pub use crate::types::{GustResult, HookResult};

    pub use gust_core::prelude::IterationBailError;
    pub use gust_instruments::Threshold;

    pub use futures::future::BoxFuture;
    pub use futures::FutureExt;
}
