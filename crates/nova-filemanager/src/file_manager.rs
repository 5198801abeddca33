//! File-manager facade (C8): implements the compiler-host file-manager
//! contract in terms of the [`crate::repository::Repository`], with input
//! validation and the location-kind policy table from the component design.

use nova_modules::ModuleName;

use crate::class_loader::ClassLoader;
use crate::error::{FileManagerError, Result};
use crate::group::{ModuleContainerGroup, OutputContainerGroup, PackageContainerGroup};
use crate::handle::FileHandle;
use crate::kind::Kind;
use crate::location::Location;
use crate::path_root::PathRoot;
use crate::repository::Repository;

pub struct FileManager {
    repository: Repository,
    release: Option<u16>,
}

impl FileManager {
    pub fn new(release: Option<u16>) -> Self {
        Self {
            repository: Repository::new(release),
            release,
        }
    }

    pub fn get_effective_release(&self) -> Option<u16> {
        self.release
    }

    pub fn add_path(&mut self, location: Location, root: &PathRoot) -> Result<()> {
        self.repository.add_path(location, root)
    }

    pub fn add_paths(&mut self, location: Location, roots: &[PathRoot]) -> Result<()> {
        for root in roots {
            self.repository.add_path(location.clone(), root)?;
        }
        Ok(())
    }

    pub fn copy_containers(&mut self, from: &Location, to: &Location) -> Result<()> {
        self.repository.copy_containers(from, to)
    }

    pub fn create_empty_location(&mut self, location: Location) -> Result<()> {
        self.repository.create_empty_location(location)
    }

    pub fn has_location(&self, location: &Location) -> bool {
        self.repository.get_group(location).is_some()
    }

    fn require_package_group(&self, location: &Location) -> Result<Option<&PackageContainerGroup>> {
        self.repository.get_package_oriented_group(location)
    }

    pub fn get_file_for_input(
        &self,
        location: &Location,
        package: &str,
        relative_name: &str,
    ) -> Result<Option<FileHandle>> {
        match self.require_package_group(location)? {
            Some(group) => group.get_file_for_input(package, relative_name),
            None => Ok(None),
        }
    }

    pub fn get_java_file_for_input(
        &self,
        location: &Location,
        binary_name: &str,
        kind: Kind,
    ) -> Result<Option<FileHandle>> {
        match self.require_package_group(location)? {
            Some(group) => group.get_java_file_for_input(binary_name, kind),
            None => Ok(None),
        }
    }

    pub fn list(
        &self,
        location: &Location,
        package: &str,
        kinds: &[Kind],
        recurse: bool,
    ) -> Result<Vec<FileHandle>> {
        match self.require_package_group(location)? {
            Some(group) => group.list_files_by_kind(package, kinds, recurse),
            None => Ok(Vec::new()),
        }
    }

    pub fn infer_binary_name(&self, location: &Location, handle: &FileHandle) -> Option<String> {
        self.require_package_group(location)
            .ok()
            .flatten()
            .and_then(|group| group.infer_binary_name(handle))
    }

    pub fn get_class_loader(&self, location: &Location) -> Result<Option<std::sync::Arc<ClassLoader>>> {
        Ok(self.require_package_group(location)?.map(|g| g.class_loader()))
    }

    /// `location` must be an output location (a ModuleLocation is permitted
    /// and auto-creates the module sub-group).
    pub fn get_file_for_output(
        &mut self,
        location: &Location,
        package: &str,
        relative_name: &str,
    ) -> Result<Option<FileHandle>> {
        if !location.is_output() {
            return Err(FileManagerError::wrong_location_kind(location, "output"));
        }
        let output = self.output_group_for(location)?;
        match location.as_module() {
            Some(module) => {
                let sub = output.get_or_create_module(module.module_name().clone())?;
                sub.get_file_for_output(package, relative_name)
            }
            None => output.get_file_for_output(package, relative_name),
        }
    }

    pub fn get_java_file_for_output(
        &mut self,
        location: &Location,
        binary_name: &str,
        kind: Kind,
    ) -> Result<Option<FileHandle>> {
        if !location.is_output() {
            return Err(FileManagerError::wrong_location_kind(location, "output"));
        }
        let output = self.output_group_for(location)?;
        match location.as_module() {
            Some(module) => {
                let sub = output.get_or_create_module(module.module_name().clone())?;
                sub.get_java_file_for_output(binary_name, kind)
            }
            None => output.get_java_file_for_output(binary_name, kind),
        }
    }

    fn output_group_for(&mut self, location: &Location) -> Result<&mut OutputContainerGroup> {
        let root_location = location.as_module().map(|m| m.parent().clone()).unwrap_or_else(|| location.clone());
        self.repository.create_empty_location(root_location.clone())?;
        match self.repository.get_output_group(&root_location)? {
            Some(_) => {}
            None => return Err(FileManagerError::NotFound(root_location.clone())),
        }
        // Re-borrow mutably through the internal map now that existence is confirmed.
        self.repository.get_output_group_mut(&root_location)
    }

    pub fn get_module_container_group(&self, location: &Location) -> Result<Option<&ModuleContainerGroup>> {
        if !location.is_module_oriented() {
            return Err(FileManagerError::wrong_location_kind(location, "module-oriented"));
        }
        self.repository.get_module_group(location)
    }

    pub fn get_output_container_group(&self, location: &Location) -> Result<Option<&OutputContainerGroup>> {
        if !location.is_output() {
            return Err(FileManagerError::wrong_location_kind(location, "output"));
        }
        self.repository.get_output_group(location)
    }

    pub fn get_package_container_group(&self, location: &Location) -> Result<Option<&PackageContainerGroup>> {
        if !location.is_package_oriented_input() {
            return Err(FileManagerError::wrong_location_kind(location, "package-oriented input"));
        }
        self.repository.get_package_group(location)
    }

    pub fn infer_module_name(&self, location: &Location) -> Result<Option<ModuleName>> {
        if !location.is_package_oriented_input() && !location.is_module_oriented() && !location.is_output() {
            return Err(FileManagerError::wrong_location_kind(location, "package-oriented"));
        }
        Ok(location.as_module().map(|m| m.module_name().clone()))
    }

    pub fn get_location_for_module_by_name(&mut self, parent: &Location, name: ModuleName) -> Result<Location> {
        if !parent.is_module_oriented() && !parent.is_output() {
            return Err(FileManagerError::wrong_location_kind(parent, "module-oriented"));
        }
        Location::module(parent.clone(), name)
    }

    pub fn get_location_for_module_by_handle<'a>(
        &self,
        parent: &Location,
        handle: &'a FileHandle,
    ) -> Result<Option<&'a Location>> {
        if !parent.is_module_oriented() && !parent.is_output() {
            return Err(FileManagerError::wrong_location_kind(parent, "module-oriented"));
        }
        match handle.location().as_module() {
            Some(module) if module.parent() == parent => Ok(Some(handle.location())),
            _ => Ok(None),
        }
    }

    pub fn list_locations_for_modules(&self, location: &Location) -> Result<Vec<Vec<Location>>> {
        if !location.is_module_oriented() && !location.is_output() {
            return Err(FileManagerError::wrong_location_kind(location, "module-oriented"));
        }
        Ok(vec![self.repository.list_locations_for_modules(location)?])
    }

    pub fn get_service_loader(&self, location: &Location) -> Result<std::sync::Arc<ClassLoader>> {
        match self.repository.get_package_oriented_group(location)? {
            Some(group) => group.get_service_loader(),
            None => Err(FileManagerError::NotFound(location.clone())),
        }
    }

    pub fn contains(&self, location: &Location, handle: &FileHandle) -> bool {
        match self.repository.get_group(location) {
            None => false,
            Some(crate::repository::Group::Package(g)) => g.contains(handle),
            Some(crate::repository::Group::Module(g)) => {
                g.iter().any(|(_, sub)| sub.contains(handle))
            }
            Some(crate::repository::Group::Output(g)) => g.contains(handle),
        }
    }

    pub fn is_same_file(a: &FileHandle, b: &FileHandle) -> bool {
        a.display_uri() == b.display_uri()
    }

    /// No option is ever consumed by this file manager.
    pub fn handle_option(&mut self, _option: &str, _arguments: &[String]) -> bool {
        false
    }

    /// No compiler options are recognised at this layer.
    pub fn is_supported_option(_option: &str) -> i32 {
        -1
    }

    pub fn flush(&self) -> Result<()> {
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        self.repository.close()
    }
}
