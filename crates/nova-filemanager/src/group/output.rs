use nova_modules::ModuleName;

use crate::container::Container;
use crate::error::{aggregate_close_errors, FileManagerError, Result};
use crate::group::module::ModuleContainerGroup;
use crate::group::package::PackageContainerGroup;
use crate::handle::FileHandle;
use crate::kind::Kind;
use crate::location::Location;
use crate::path_root::PathRoot;

/// Behaves as both a package-oriented group and a module-oriented group at
/// the same output location (C6): the package side may hold only a single
/// writable "legacy" (non-modular) output container, while the module side
/// behaves exactly like [`ModuleContainerGroup`].
pub struct OutputContainerGroup {
    package: PackageContainerGroup,
    modules: ModuleContainerGroup,
}

impl OutputContainerGroup {
    pub fn new(location: Location, release: Option<u16>) -> Result<Self> {
        if !location.is_output() {
            return Err(FileManagerError::wrong_location_kind(&location, "output"));
        }
        Ok(Self {
            package: PackageContainerGroup::new(location.clone(), release)?,
            modules: ModuleContainerGroup::new(location, release)?,
        })
    }

    pub fn location(&self) -> &Location {
        self.package.location()
    }

    /// Sets the single legacy output container. Fails if one is already
    /// registered: an output location's package side may hold only one
    /// writable root by contract.
    pub fn set_package_container(&mut self, root: &PathRoot) -> Result<()> {
        if !self.package.containers().is_empty() {
            return Err(FileManagerError::illegal_argument(
                "an output location may only have a single package-oriented container",
            ));
        }
        self.package.add_package(root)
    }

    pub fn add_module(&mut self, name: ModuleName, root: &PathRoot) -> Result<()> {
        self.modules.add_module(name, root)
    }

    pub fn add_module_container(&mut self, name: ModuleName, container: Container) -> Result<()> {
        self.modules.add_module_container(name, container)
    }

    pub fn get_module(&self, name: &ModuleName) -> Option<&PackageContainerGroup> {
        self.modules.get_module(name)
    }

    pub fn get_or_create_module(&mut self, name: ModuleName) -> Result<&mut PackageContainerGroup> {
        self.modules.get_or_create_module(name)
    }

    pub fn locations_for_modules(&self) -> Vec<Location> {
        self.modules.locations_for_modules()
    }

    /// Tries the package side first, then each module side.
    pub fn get_file_for_output(&self, package: &str, relative_name: &str) -> Result<Option<FileHandle>> {
        if let Some(handle) = self.package.get_file_for_output(package, relative_name)? {
            return Ok(Some(handle));
        }
        for (_, module) in self.modules.iter() {
            if let Some(handle) = module.get_file_for_output(package, relative_name)? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    pub fn get_java_file_for_output(&self, binary_name: &str, kind: Kind) -> Result<Option<FileHandle>> {
        if let Some(handle) = self.package.get_java_file_for_output(binary_name, kind)? {
            return Ok(Some(handle));
        }
        for (_, module) in self.modules.iter() {
            if let Some(handle) = module.get_java_file_for_output(binary_name, kind)? {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    pub fn contains(&self, handle: &FileHandle) -> bool {
        self.package.contains(handle) || self.modules.iter().any(|(_, m)| m.contains(handle))
    }

    pub fn infer_binary_name(&self, handle: &FileHandle) -> Option<String> {
        self.package
            .infer_binary_name(handle)
            .or_else(|| self.modules.iter().find_map(|(_, m)| m.infer_binary_name(handle)))
    }

    /// Closes both sides unconditionally, even if the package side fails,
    /// so a failure on one never abandons closing the other.
    pub fn close(&mut self) -> Result<()> {
        let package_result = self.package.close();
        let modules_result = self.modules.close();
        aggregate_close_errors(vec![package_result, modules_result])
    }
}
