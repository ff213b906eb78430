use formcast_shared::ErrorSet;

/// A nested association resolved by name on a [`ValidatedModel`]
pub enum Association<'m> {
    /// One-to-one: a single nested model
    Singular(&'m dyn ValidatedModel),
    /// One-to-many: nested models in collection order
    Collection(Vec<&'m dyn ValidatedModel>),
}

/// Adapter capability the broadcast engine requires of a model.
///
/// The engine never reflects on the model: associations are resolved
/// through the explicit [`ValidatedModel::association`] lookup, and
/// validity comes entirely from the externally populated [`ErrorSet`].
pub trait ValidatedModel {
    /// Naming-convention identifier for this model type: the lower-cased,
    /// underscored type name (e.g. `"order"`)
    fn model_name(&self) -> &str;

    /// Validation errors currently recorded against this instance
    fn errors(&self) -> &ErrorSet;

    /// Runs validations, repopulating the error set.
    ///
    /// The engine calls this only when the error set is empty at broadcast
    /// entry; an instance already holding errors is broadcast as-is, even
    /// if those errors are stale.
    fn validate(&mut self);

    /// Resolves a declared association by name (the `_attributes` branch
    /// suffix already stripped). Returning `None` for a requested branch
    /// aborts the broadcast with
    /// [`BroadcastError::AssociationNotFound`](crate::BroadcastError::AssociationNotFound).
    fn association(&self, name: &str) -> Option<Association<'_>>;
}
