use std::collections::BTreeMap;

use nova_modules::ModuleName;

use crate::container::Container;
use crate::error::{aggregate_close_errors, FileManagerError, Result};
use crate::group::package::PackageContainerGroup;
use crate::location::Location;
use crate::path_root::PathRoot;

/// A mapping from module name to a dedicated [`PackageContainerGroup`] (C5).
///
/// Module slots are created on first use and never removed; closing closes
/// every module's sub-group.
pub struct ModuleContainerGroup {
    location: Location,
    release: Option<u16>,
    modules: BTreeMap<ModuleName, PackageContainerGroup>,
}

impl ModuleContainerGroup {
    pub fn new(location: Location, release: Option<u16>) -> Result<Self> {
        if !location.is_module_oriented() && !location.is_output() {
            return Err(FileManagerError::wrong_location_kind(&location, "module-oriented"));
        }
        Ok(Self {
            location,
            release,
            modules: BTreeMap::new(),
        })
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn get_module(&self, name: &ModuleName) -> Option<&PackageContainerGroup> {
        self.modules.get(name)
    }

    pub fn get_module_mut(&mut self, name: &ModuleName) -> Option<&mut PackageContainerGroup> {
        self.modules.get_mut(name)
    }

    /// Idempotently creates the sub-group for `name`, whose location is
    /// `ModuleLocation(self.location, name)`.
    pub fn get_or_create_module(&mut self, name: ModuleName) -> Result<&mut PackageContainerGroup> {
        if !self.modules.contains_key(&name) {
            let module_location = Location::module(self.location.clone(), name.clone())?;
            let group = PackageContainerGroup::new(module_location, self.release)?;
            self.modules.insert(name.clone(), group);
        }
        Ok(self.modules.get_mut(&name).expect("just inserted"))
    }

    pub fn add_module_container(&mut self, name: ModuleName, container: Container) -> Result<()> {
        self.get_or_create_module(name)?.add_package_container(container);
        Ok(())
    }

    pub fn add_module(&mut self, name: ModuleName, root: &PathRoot) -> Result<()> {
        self.get_or_create_module(name)?.add_package(root)
    }

    pub fn locations_for_modules(&self) -> Vec<Location> {
        self.modules.values().map(|g| g.location().clone()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ModuleName, &PackageContainerGroup)> {
        self.modules.iter()
    }

    pub fn close(&mut self) -> Result<()> {
        let results: Vec<Result<()>> = self.modules.values_mut().map(|g| g.close()).collect();
        self.modules.clear();
        aggregate_close_errors(results)
    }
}
