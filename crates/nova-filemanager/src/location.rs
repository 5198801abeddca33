use std::fmt;

use nova_modules::ModuleName;

use crate::error::{FileManagerError, Result};

/// A non-module location's name and its two orthogonal flags.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SimpleLocation {
    name: String,
    output: bool,
    module_oriented: bool,
}

/// A derived location naming one module within a module-oriented or output
/// parent location.
///
/// Never itself module-oriented; inherits `output?` from its parent.
/// Equality and the displayed name are both derived from `(parent, module)`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ModuleLocation {
    parent: Box<Location>,
    module: ModuleName,
}

impl ModuleLocation {
    pub fn parent(&self) -> &Location {
        &self.parent
    }

    pub fn module_name(&self) -> &ModuleName {
        &self.module
    }
}

/// An opaque identity for a partition of the file manager's virtual
/// filesystem (classpath, source path, module path, output sinks, a single
/// module within a module-oriented/output location, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Location {
    Simple(SimpleLocation),
    Module(ModuleLocation),
}

impl Location {
    fn simple(name: impl Into<String>, output: bool, module_oriented: bool) -> Self {
        Location::Simple(SimpleLocation {
            name: name.into(),
            output,
            module_oriented,
        })
    }

    /// A package-oriented location not otherwise known to the file manager
    /// (e.g. a driver-defined annotation-processor path variant).
    pub fn named(name: impl Into<String>) -> Self {
        Self::simple(name, false, false)
    }

    pub fn class_path() -> Self {
        Self::simple("CLASS_PATH", false, false)
    }

    pub fn source_path() -> Self {
        Self::simple("SOURCE_PATH", false, false)
    }

    pub fn module_source_path() -> Self {
        Self::simple("MODULE_SOURCE_PATH", false, true)
    }

    pub fn module_path() -> Self {
        Self::simple("MODULE_PATH", false, true)
    }

    pub fn system_modules() -> Self {
        Self::simple("SYSTEM_MODULES", false, true)
    }

    pub fn class_output() -> Self {
        Self::simple("CLASS_OUTPUT", true, false)
    }

    pub fn source_output() -> Self {
        Self::simple("SOURCE_OUTPUT", true, false)
    }

    pub fn native_header_output() -> Self {
        Self::simple("NATIVE_HEADER_OUTPUT", true, false)
    }

    pub fn annotation_processor_path() -> Self {
        Self::simple("ANNOTATION_PROCESSOR_PATH", false, false)
    }

    pub fn annotation_processor_module_path() -> Self {
        Self::simple("ANNOTATION_PROCESSOR_MODULE_PATH", false, true)
    }

    /// Construct a [`ModuleLocation`] naming `module` within `parent`.
    ///
    /// `parent` must be module-oriented or an output location; constructing
    /// a module location otherwise is a programming error.
    pub fn module(parent: Location, module: ModuleName) -> Result<Self> {
        if !parent.is_module_oriented() && !parent.is_output() {
            return Err(FileManagerError::illegal_argument(format!(
                "cannot derive a module location from {parent:?}: parent must be \
                 module-oriented or an output location"
            )));
        }
        Ok(Location::Module(ModuleLocation {
            parent: Box::new(parent),
            module,
        }))
    }

    pub fn as_module(&self) -> Option<&ModuleLocation> {
        match self {
            Location::Module(m) => Some(m),
            Location::Simple(_) => None,
        }
    }

    pub fn is_output(&self) -> bool {
        match self {
            Location::Simple(s) => s.output,
            Location::Module(m) => m.parent.is_output(),
        }
    }

    pub fn is_module_oriented(&self) -> bool {
        match self {
            Location::Simple(s) => s.module_oriented,
            Location::Module(_) => false,
        }
    }

    /// A location is package-oriented input iff it is neither output nor
    /// module-oriented (a `ModuleLocation` is package-oriented exactly when
    /// its parent is module-oriented and not output, matching javac's
    /// treatment of per-module source/class sub-locations).
    pub fn is_package_oriented_input(&self) -> bool {
        !self.is_output() && !self.is_module_oriented()
    }

    pub fn name(&self) -> String {
        match self {
            Location::Simple(s) => s.name.clone(),
            Location::Module(m) => format!("{}[{}]", m.parent.name(), m.module.as_str()),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_locations_have_expected_flags() {
        assert!(Location::class_path().is_package_oriented_input());
        assert!(Location::source_path().is_package_oriented_input());

        assert!(Location::module_source_path().is_module_oriented());
        assert!(!Location::module_source_path().is_output());

        assert!(Location::class_output().is_output());
        assert!(!Location::class_output().is_module_oriented());
    }

    #[test]
    fn module_location_rejects_non_module_oriented_parent() {
        let err = Location::module(Location::class_path(), ModuleName::new("m"));
        assert!(err.is_err());
    }

    #[test]
    fn module_location_allows_module_oriented_or_output_parent() {
        assert!(Location::module(Location::module_source_path(), ModuleName::new("m")).is_ok());
        assert!(Location::module(Location::class_output(), ModuleName::new("m")).is_ok());
    }

    #[test]
    fn module_location_name_and_equality() {
        let a = Location::module(Location::module_source_path(), ModuleName::new("mod.a")).unwrap();
        let b = Location::module(Location::module_source_path(), ModuleName::new("mod.a")).unwrap();
        let c = Location::module(Location::module_source_path(), ModuleName::new("mod.b")).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.name(), "MODULE_SOURCE_PATH[mod.a]");

        let module_loc = a.as_module().unwrap();
        assert_eq!(module_loc.module_name().as_str(), "mod.a");
        assert!(module_loc.parent().is_module_oriented());
        assert!(!a.is_module_oriented());
        assert!(!a.is_output());
    }

    #[test]
    fn module_location_inherits_output_from_parent() {
        let out_mod = Location::module(Location::class_output(), ModuleName::new("mod.a")).unwrap();
        assert!(out_mod.is_output());
        assert!(!out_mod.is_module_oriented());
    }
}
