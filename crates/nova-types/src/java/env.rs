use crate::{ClassDef, ClassId, ExecutableDef, ExecutableId, TypeParamDef, TypeVarId, WellKnownTypes};

/// Read-only view of the host type model.
///
/// Implementations must be cheap to query: the type graph calls into the environment on every
/// navigation step and does not cache what it reads.
pub trait TypeEnv {
    fn class(&self, id: ClassId) -> Option<&ClassDef>;

    fn type_param(&self, id: TypeVarId) -> Option<&TypeParamDef>;

    fn executable(&self, id: ExecutableId) -> Option<&ExecutableDef>;

    /// Look up a class by binary name. Simple names fall back to `java.lang`.
    fn lookup_class(&self, name: &str) -> Option<ClassId>;

    fn well_known(&self) -> &WellKnownTypes;

    /// Name of a type variable, if it is known to the environment.
    fn type_param_name(&self, id: TypeVarId) -> Option<&str> {
        self.type_param(id).map(|def| def.name.as_str())
    }
}
