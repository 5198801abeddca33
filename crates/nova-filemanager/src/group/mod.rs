pub mod module;
pub mod output;
pub mod package;

pub use module::ModuleContainerGroup;
pub use output::OutputContainerGroup;
pub use package::PackageContainerGroup;
