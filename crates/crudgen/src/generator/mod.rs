pub(crate) mod ast;
pub(crate) mod codegen;
pub(crate) mod composer;
pub(crate) mod descriptor;
pub mod emitter;
pub(crate) mod endpoint;
pub(crate) mod metrics;
pub mod orchestrator;
pub(crate) mod writers;
