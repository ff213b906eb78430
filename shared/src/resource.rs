/// Marker suffix that turns a requested key into a traversal branch
/// rather than a leaf attribute
pub const NESTED_ATTRIBUTES_SUFFIX: &str = "_attributes";

/// Returns the association name for a branch key, or `None` if the key
/// denotes a leaf attribute.
///
/// The suffix itself is stripped before the remainder is used as the
/// association name; a key consisting of nothing but the suffix is not a
/// branch.
pub fn association_name(key: &str) -> Option<&str> {
    match key.strip_suffix(NESTED_ATTRIBUTES_SUFFIX) {
        Some("") | None => None,
        Some(name) => Some(name),
    }
}

// PathSegment

/// One level of the association tree between the root model and a nested
/// model instance.
///
/// The index is present only for one-to-many associations; one-to-one
/// levels and the root carry none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    name: String,
    index: Option<usize>,
}

impl PathSegment {
    /// Root segment: the model's naming-convention identifier
    /// (lower-cased, underscored type name)
    pub fn root(model_name: &str) -> Self {
        Self {
            name: model_name.to_lowercase(),
            index: None,
        }
    }

    /// A one-to-one association level
    pub fn singular(association: &str) -> Self {
        Self {
            name: association.to_string(),
            index: None,
        }
    }

    /// A one-to-many association level at the given collection index
    pub fn indexed(association: &str, index: usize) -> Self {
        Self {
            name: association.to_string(),
            index: Some(index),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }
}

// AncestryPath

/// Ordered root-to-leaf ancestry of one model instance inside the
/// association tree.
///
/// Constructed transiently during one broadcast invocation; never
/// persisted. The derived resource name folds the path root-to-leaf:
/// the root contributes its own name, and every nested level appends
/// `_{association}_attributes`, plus `_{index}` when the level is
/// collection-valued.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AncestryPath {
    segments: Vec<PathSegment>,
}

impl AncestryPath {
    /// Path containing only the root model
    pub fn root(model_name: &str) -> Self {
        Self {
            segments: vec![PathSegment::root(model_name)],
        }
    }

    /// Extends the path by one nesting level
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Derives the resource name used as the `RESOURCE` substitution token
    pub fn resource_name(&self) -> String {
        let mut segments = self.segments.iter();
        let Some(root) = segments.next() else {
            return String::new();
        };

        let mut name = root.name().to_string();
        for segment in segments {
            name.push('_');
            name.push_str(segment.name());
            name.push_str(NESTED_ATTRIBUTES_SUFFIX);
            if let Some(index) = segment.index() {
                name.push('_');
                name.push_str(&index.to_string());
            }
        }
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_only_path_is_the_model_name() {
        assert_eq!(AncestryPath::root("Order").resource_name(), "order");
    }

    #[test]
    fn each_nesting_level_inserts_one_attributes_segment() {
        let root = AncestryPath::root("a");
        assert_eq!(root.resource_name(), "a");

        let indexed = root.child(PathSegment::indexed("b", 2));
        assert_eq!(indexed.resource_name(), "a_b_attributes_2");

        let singular = indexed.child(PathSegment::singular("c"));
        assert_eq!(singular.resource_name(), "a_b_attributes_2_c_attributes");
    }

    #[test]
    fn association_name_strips_the_branch_suffix() {
        assert_eq!(association_name("items_attributes"), Some("items"));
        assert_eq!(association_name("quantity"), None);
        assert_eq!(association_name("_attributes"), None);
    }

    #[test]
    fn empty_path_derives_an_empty_name() {
        assert_eq!(AncestryPath::default().resource_name(), "");
    }
}
