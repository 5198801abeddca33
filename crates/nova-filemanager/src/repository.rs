//! Group repository (C7): the registry from location identity to the
//! appropriate container-group kind, enforcing location-kind invariants and
//! the source-path / module-source-path mutual-exclusion rule.

use std::collections::BTreeMap;

use nova_modules::ModuleName;

use crate::container::Container;
use crate::error::{FileManagerError, Result};
use crate::group::{ModuleContainerGroup, OutputContainerGroup, PackageContainerGroup};
use crate::location::Location;
use crate::path_root::PathRoot;

/// The group kind bound to one location.
pub enum Group {
    Package(PackageContainerGroup),
    Module(ModuleContainerGroup),
    Output(OutputContainerGroup),
}

/// Ordered (by location name) mapping from [`Location`] to [`Group`].
pub struct Repository {
    release: Option<u16>,
    groups: BTreeMap<String, (Location, Group)>,
}

impl Repository {
    pub fn new(release: Option<u16>) -> Self {
        Self {
            release,
            groups: BTreeMap::new(),
        }
    }

    fn conflicting_location(&self, location: &Location) -> Option<&'static str> {
        let root = location.as_module().map(|m| m.parent()).unwrap_or(location);
        if *root == Location::source_path() && self.groups.contains_key(&Location::module_source_path().name()) {
            return Some("source-path conflicts with already-registered module-source-path");
        }
        if *root == Location::module_source_path() && self.groups.contains_key(&Location::source_path().name()) {
            return Some("module-source-path conflicts with already-registered source-path");
        }
        None
    }

    /// Dispatches by location kind to the right group kind, creating it on
    /// demand, and appends `root` to it.
    pub fn add_path(&mut self, location: Location, root: &PathRoot) -> Result<()> {
        if let Some(reason) = self.conflicting_location(&location) {
            return Err(FileManagerError::illegal_argument(reason));
        }

        if location.is_output() {
            let group = self.get_or_create_output_mut(location.clone())?;
            match location.as_module() {
                Some(module) => group.add_module(module.module_name().clone(), root)?,
                None => group.set_package_container(root)?,
            }
        } else if location.is_module_oriented() {
            // A bare module-oriented location (not a `ModuleLocation`): the
            // module this root belongs to is not known ahead of time, so it
            // must be discovered from the root itself (module-info.class,
            // Automatic-Module-Name, or a derived filename).
            let container = Container::from_root(root, self.release)?;
            let name = container
                .module_finder()
                .and_then(|discovered| discovered.name)
                .ok_or_else(|| {
                    FileManagerError::illegal_argument(
                        "module-path entry has no derivable module name (no module-info.class, \
                         Automatic-Module-Name, or usable file name)",
                    )
                })?;
            let group = self.get_or_create_module_mut(location.clone())?;
            group.add_module_container(name, container)?;
        } else if let Some(module) = location.as_module() {
            // A ModuleLocation whose parent is module-oriented: route to the
            // parent module group's per-module sub-group.
            let parent = module.parent().clone();
            let name = module.module_name().clone();
            let group = self.get_or_create_module_mut(parent)?;
            group.add_module(name, root)?;
        } else {
            let group = self.get_or_create_package_mut(location)?;
            group.add_package(root)?;
        }
        Ok(())
    }

    pub fn get_group(&self, location: &Location) -> Option<&Group> {
        self.groups.get(&location.name()).map(|(_, g)| g)
    }

    pub fn get_package_group(&self, location: &Location) -> Result<Option<&PackageContainerGroup>> {
        match self.get_group(location) {
            None => Ok(None),
            Some(Group::Package(g)) => Ok(Some(g)),
            Some(_) => Err(FileManagerError::wrong_location_kind(location, "package-oriented")),
        }
    }

    pub fn get_module_group(&self, location: &Location) -> Result<Option<&ModuleContainerGroup>> {
        match self.get_group(location) {
            None => Ok(None),
            Some(Group::Module(g)) => Ok(Some(g)),
            Some(_) => Err(FileManagerError::wrong_location_kind(location, "module-oriented")),
        }
    }

    pub fn get_output_group(&self, location: &Location) -> Result<Option<&OutputContainerGroup>> {
        match self.get_group(location) {
            None => Ok(None),
            Some(Group::Output(g)) => Ok(Some(g)),
            Some(_) => Err(FileManagerError::wrong_location_kind(location, "output")),
        }
    }

    pub fn get_output_group_mut(&mut self, location: &Location) -> Result<&mut OutputContainerGroup> {
        let key = location.name();
        match self.groups.get_mut(&key) {
            Some((_, Group::Output(g))) => Ok(g),
            Some(_) => Err(FileManagerError::wrong_location_kind(location, "output")),
            None => Err(FileManagerError::NotFound(location.clone())),
        }
    }

    /// Resolves a `ModuleLocation` to its parent's per-module sub-group, or a
    /// package-oriented location to its package group directly.
    pub fn get_package_oriented_group(&self, location: &Location) -> Result<Option<&PackageContainerGroup>> {
        if let Some(module) = location.as_module() {
            return match self.get_group(module.parent()) {
                None => Ok(None),
                Some(Group::Module(g)) => Ok(g.get_module(module.module_name())),
                Some(Group::Output(g)) => Ok(g.get_module(module.module_name())),
                Some(Group::Package(_)) => {
                    Err(FileManagerError::wrong_location_kind(location, "module-oriented"))
                }
            };
        }
        self.get_package_group(location)
    }

    /// Appends each container of `from` to `to`; both must already exist and
    /// be the same package-oriented kind.
    pub fn copy_containers(&mut self, from: &Location, to: &Location) -> Result<()> {
        let from_containers: Vec<_> = self
            .get_package_oriented_group(from)?
            .ok_or_else(|| FileManagerError::NotFound(from.clone()))?
            .containers()
            .to_vec();

        let to_location = to.clone();
        self.ensure_group_for(to_location.clone())?;
        let (_, group) = self
            .groups
            .get_mut(&to_location.name())
            .expect("just ensured");
        let target = match group {
            Group::Package(g) => g,
            Group::Module(_) | Group::Output(_) => {
                return Err(FileManagerError::wrong_location_kind(to, "package-oriented"))
            }
        };
        for container in from_containers {
            target.add_shared_container(container);
        }
        Ok(())
    }

    /// Creates an empty group of the right kind for `location`; idempotent.
    pub fn create_empty_location(&mut self, location: Location) -> Result<()> {
        self.ensure_group_for(location)
    }

    /// For module-oriented or output locations, the set of currently known
    /// `ModuleLocation`s.
    pub fn list_locations_for_modules(&self, location: &Location) -> Result<Vec<Location>> {
        match self.get_group(location) {
            None => Ok(Vec::new()),
            Some(Group::Module(g)) => Ok(g.locations_for_modules()),
            Some(Group::Output(g)) => Ok(g.locations_for_modules()),
            Some(Group::Package(_)) => Err(FileManagerError::wrong_location_kind(location, "module-oriented")),
        }
    }

    fn ensure_group_for(&mut self, location: Location) -> Result<()> {
        if self.groups.contains_key(&location.name()) {
            return Ok(());
        }
        if let Some(reason) = self.conflicting_location(&location) {
            return Err(FileManagerError::illegal_argument(reason));
        }
        if location.is_output() {
            self.get_or_create_output_mut(location)?;
        } else if location.is_module_oriented() {
            self.get_or_create_module_mut(location)?;
        } else {
            self.get_or_create_package_mut(location)?;
        }
        Ok(())
    }

    fn get_or_create_package_mut(&mut self, location: Location) -> Result<&mut PackageContainerGroup> {
        let key = location.name();
        if !self.groups.contains_key(&key) {
            let group = PackageContainerGroup::new(location.clone(), self.release)?;
            self.groups.insert(key.clone(), (location, Group::Package(group)));
        }
        match &mut self.groups.get_mut(&key).expect("just inserted").1 {
            Group::Package(g) => Ok(g),
            _ => unreachable!("key was just inserted as Package"),
        }
    }

    fn get_or_create_module_mut(&mut self, location: Location) -> Result<&mut ModuleContainerGroup> {
        let key = location.name();
        if !self.groups.contains_key(&key) {
            let group = ModuleContainerGroup::new(location.clone(), self.release)?;
            self.groups.insert(key.clone(), (location, Group::Module(group)));
        }
        match &mut self.groups.get_mut(&key).expect("just inserted").1 {
            Group::Module(g) => Ok(g),
            _ => unreachable!("key was just inserted as Module"),
        }
    }

    fn get_or_create_output_mut(&mut self, location: Location) -> Result<&mut OutputContainerGroup> {
        let key = location.name();
        if !self.groups.contains_key(&key) {
            let group = OutputContainerGroup::new(location.clone(), self.release)?;
            self.groups.insert(key.clone(), (location, Group::Output(group)));
        }
        match &mut self.groups.get_mut(&key).expect("just inserted").1 {
            Group::Output(g) => Ok(g),
            _ => unreachable!("key was just inserted as Output"),
        }
    }

    pub fn close(&mut self) -> Result<()> {
        let results: Vec<Result<()>> = self
            .groups
            .values_mut()
            .map(|(_, group)| match group {
                Group::Package(g) => g.close(),
                Group::Module(g) => g.close(),
                Group::Output(g) => g.close(),
            })
            .collect();
        self.groups.clear();
        crate::error::aggregate_close_errors(results)
    }
}
