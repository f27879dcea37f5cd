//! Entity aliases and alias-qualified property paths.
//!
//! An [`EntityAlias`] binds a contract type to a backing type, a property to
//! field mapping and a short alias name. Properties reached through
//! [`EntityAlias::to`] become [`Path`]s that render as `alias.field`.
//!
//! # Example
//! ```ignore
//! use predql::{alias, select_from};
//!
//! let c = alias::from::<Contact>().named("c")?;
//! let age = c.to("age")?;
//! let sql = select_from(&c).filter([age.geq(18)])?.query().sql().to_string();
//! assert_eq!(sql, "SELECT c FROM ContactEntity AS c WHERE c.age >= ?1");
//! ```

use crate::error::{QueryError, QueryResult};
use crate::expr::{Argument, Comparison, Expression, IntoArgument, Operator};
use crate::ident::{validate_dotted, validate_part};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// A declared property and the backing field it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub field: &'static str,
}

impl Property {
    pub const fn new(name: &'static str, field: &'static str) -> Self {
        Self { name, field }
    }

    /// A property whose field has the same name.
    pub const fn named(name: &'static str) -> Self {
        Self { name, field: name }
    }
}

/// Binding metadata for a contract type.
///
/// Usually implemented through `#[derive(Entity)]`.
pub trait Entity: 'static {
    /// Backing type name written after `FROM` / `UPDATE`.
    const BACKING: &'static str;
    /// Declared properties in declaration order.
    const PROPERTIES: &'static [Property];
}

/// Property to field overrides for an alias, typed by the row type `P`
/// that query results are mapped to.
pub struct Prototype<P> {
    fields: Vec<(String, String)>,
    _row: PhantomData<fn() -> P>,
}

impl<P> Prototype<P> {
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            _row: PhantomData,
        }
    }

    /// Bind `property` to a differently named backing `field`.
    pub fn field(mut self, property: impl Into<String>, field: impl Into<String>) -> Self {
        self.fields.push((property.into(), field.into()));
        self
    }
}

impl<P: Entity> Prototype<P> {
    /// Seed the mapping from another entity's declared properties.
    pub fn of_entity() -> Self {
        P::PROPERTIES
            .iter()
            .fold(Self::new(), |proto, p| proto.field(p.name, p.field))
    }
}

impl<P> Default for Prototype<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> fmt::Debug for Prototype<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prototype")
            .field("row", &std::any::type_name::<P>())
            .field("fields", &self.fields)
            .finish()
    }
}

/// Start binding an alias for the contract type `E`.
pub fn from<E: Entity>() -> AliasBuilder<E, E> {
    AliasBuilder {
        backing: None,
        fields: Vec::new(),
        _marker: PhantomData,
    }
}

/// Accumulates the pieces of an alias before it is named.
///
/// `R` is the row type results are mapped to: `E` itself unless a
/// [`Prototype`] was supplied.
pub struct AliasBuilder<E, R> {
    backing: Option<String>,
    fields: Vec<(String, String)>,
    _marker: PhantomData<fn() -> (E, R)>,
}

impl<E: Entity, R> AliasBuilder<E, R> {
    /// Override the backing type declared by `E`.
    pub fn backing(mut self, backing: impl Into<String>) -> Self {
        self.backing = Some(backing.into());
        self
    }

    /// Use a prototype for field mapping; rows are then mapped to `P`.
    pub fn prototype<P>(self, prototype: Prototype<P>) -> AliasBuilder<E, P> {
        AliasBuilder {
            backing: self.backing,
            fields: prototype.fields,
            _marker: PhantomData,
        }
    }

    /// Finish the alias under `name`.
    ///
    /// All binding conflicts are detected here.
    pub fn named(self, name: &str) -> QueryResult<EntityAlias<E, R>> {
        let entity = std::any::type_name::<E>();
        validate_part("alias name", name)?;
        let backing = self.backing.unwrap_or_else(|| E::BACKING.to_string());
        validate_dotted("backing type", &backing)?;

        let mut fields = BTreeMap::new();
        for p in E::PROPERTIES {
            if fields.insert(p.name.to_string(), p.field.to_string()).is_some() {
                return Err(QueryError::ConflictingBinding(format!(
                    "property '{}' is declared twice on {entity}",
                    p.name
                )));
            }
        }

        let mut overridden: BTreeMap<&str, &str> = BTreeMap::new();
        for (property, field) in &self.fields {
            let Some(slot) = fields.get_mut(property) else {
                return Err(QueryError::unknown_property(entity, property.as_str()));
            };
            if let Some(previous) = overridden.insert(property.as_str(), field.as_str()) {
                if previous != field.as_str() {
                    return Err(QueryError::ConflictingBinding(format!(
                        "property '{property}' is bound to both '{previous}' and '{field}'"
                    )));
                }
            }
            *slot = field.clone();
        }

        let mut owners: BTreeMap<&str, &str> = BTreeMap::new();
        for (property, field) in &fields {
            validate_part("field", field)?;
            if let Some(other) = owners.insert(field.as_str(), property.as_str()) {
                return Err(QueryError::ConflictingBinding(format!(
                    "properties '{other}' and '{property}' are both bound to field '{field}'"
                )));
            }
        }

        Ok(EntityAlias {
            binding: Arc::new(AliasBinding {
                name: name.to_string(),
                backing,
                entity,
                fields,
            }),
            _marker: PhantomData,
        })
    }
}

/// Resolved alias metadata shared by every path created from it.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct AliasBinding {
    pub(crate) name: String,
    pub(crate) backing: String,
    pub(crate) entity: &'static str,
    pub(crate) fields: BTreeMap<String, String>,
}

/// A named alias for contract type `E` whose rows map to `R`.
///
/// Read-only once built; clones share the same binding.
pub struct EntityAlias<E, R = E> {
    binding: Arc<AliasBinding>,
    _marker: PhantomData<fn() -> (E, R)>,
}

impl<E, R> EntityAlias<E, R> {
    pub fn name(&self) -> &str {
        &self.binding.name
    }

    pub fn backing(&self) -> &str {
        &self.binding.backing
    }

    /// Path to `property` qualified by this alias.
    pub fn to(&self, property: &str) -> QueryResult<Path> {
        let field = self
            .binding
            .fields
            .get(property)
            .ok_or_else(|| QueryError::unknown_property(self.binding.entity, property))?;
        Ok(Path {
            binding: Arc::clone(&self.binding),
            property: property.to_string(),
            field: field.clone(),
        })
    }

    /// Bound property names with their fields.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &str)> {
        self.binding
            .fields
            .iter()
            .map(|(p, f)| (p.as_str(), f.as_str()))
    }

    pub(crate) fn binding(&self) -> &Arc<AliasBinding> {
        &self.binding
    }
}

impl<E, R> Clone for EntityAlias<E, R> {
    fn clone(&self) -> Self {
        Self {
            binding: Arc::clone(&self.binding),
            _marker: PhantomData,
        }
    }
}

impl<E, R> fmt::Debug for EntityAlias<E, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityAlias")
            .field("name", &self.binding.name)
            .field("backing", &self.binding.backing)
            .field("entity", &self.binding.entity)
            .finish()
    }
}

/// An alias-qualified property reference, rendered as `alias.field`.
#[derive(Clone, PartialEq, Eq)]
pub struct Path {
    binding: Arc<AliasBinding>,
    property: String,
    field: String,
}

impl Path {
    pub fn alias(&self) -> &str {
        &self.binding.name
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    /// Fail unless this path belongs to `binding`.
    pub(crate) fn check_bound(&self, binding: &Arc<AliasBinding>) -> QueryResult<()> {
        if Arc::ptr_eq(&self.binding, binding) || *self.binding == **binding {
            Ok(())
        } else if self.binding.name == binding.name {
            Err(QueryError::DuplicateAlias(binding.name.clone()))
        } else {
            Err(QueryError::UnboundAlias {
                expected: binding.name.clone(),
                found: self.binding.name.clone(),
            })
        }
    }

    /// Build a comparison with an explicit operator and argument list.
    ///
    /// The argument count is checked against the operator's arity.
    pub fn compare(&self, operator: Operator, arguments: Vec<Argument>) -> QueryResult<Expression> {
        Comparison::new(self.clone(), operator, arguments).map(Expression::Comparison)
    }

    fn unary(&self, operator: Operator, argument: impl IntoArgument) -> Expression {
        Expression::Comparison(Comparison::new_unchecked(
            self.clone(),
            operator,
            vec![argument.into_argument()],
        ))
    }

    /// `path = value`
    pub fn eq(&self, value: impl IntoArgument) -> Expression {
        self.unary(Operator::Eq, value)
    }

    /// `path <> value`
    pub fn ne(&self, value: impl IntoArgument) -> Expression {
        self.unary(Operator::Ne, value)
    }

    /// `path < value`
    pub fn lt(&self, value: impl IntoArgument) -> Expression {
        self.unary(Operator::Lt, value)
    }

    /// `path <= value`
    pub fn leq(&self, value: impl IntoArgument) -> Expression {
        self.unary(Operator::Leq, value)
    }

    /// `path > value`
    pub fn gt(&self, value: impl IntoArgument) -> Expression {
        self.unary(Operator::Gt, value)
    }

    /// `path >= value`
    pub fn geq(&self, value: impl IntoArgument) -> Expression {
        self.unary(Operator::Geq, value)
    }

    /// `path LIKE pattern`
    pub fn like(&self, pattern: impl IntoArgument) -> Expression {
        self.unary(Operator::Like, pattern)
    }

    /// `path BETWEEN low AND high`
    pub fn between(&self, low: impl IntoArgument, high: impl IntoArgument) -> Expression {
        Expression::Comparison(Comparison::new_unchecked(
            self.clone(),
            Operator::Between,
            vec![low.into_argument(), high.into_argument()],
        ))
    }

    /// `path IN (values...)`; an empty list is the constant FALSE.
    pub fn is_in<I>(&self, values: I) -> Expression
    where
        I: IntoIterator,
        I::Item: IntoArgument,
    {
        let arguments: Vec<Argument> = values.into_iter().map(IntoArgument::into_argument).collect();
        if arguments.is_empty() {
            return Expression::FALSE;
        }
        Expression::Comparison(Comparison::new_unchecked(self.clone(), Operator::In, arguments))
    }

    /// `path IS NULL`
    pub fn is_null(&self) -> Expression {
        Expression::Comparison(Comparison::new_unchecked(
            self.clone(),
            Operator::IsNull,
            Vec::new(),
        ))
    }

    /// `path IS NOT NULL`
    pub fn is_not_null(&self) -> Expression {
        Expression::Comparison(Comparison::new_unchecked(
            self.clone(),
            Operator::IsNotNull,
            Vec::new(),
        ))
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.binding.name, self.field)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Path")
            .field(&format_args!("{}.{}", self.binding.name, self.property))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Contact;

    impl Entity for Contact {
        const BACKING: &'static str = "ContactEntity";
        const PROPERTIES: &'static [Property] = &[
            Property::named("firstName"),
            Property::named("lastName"),
            Property::named("age"),
        ];
    }

    struct ContactRow;

    struct ContactRecord;

    impl Entity for ContactRecord {
        const BACKING: &'static str = "contacts";
        const PROPERTIES: &'static [Property] = &[
            Property::new("firstName", "first_name"),
            Property::new("lastName", "last_name"),
        ];
    }

    struct Broken;

    impl Entity for Broken {
        const BACKING: &'static str = "BrokenEntity";
        const PROPERTIES: &'static [Property] = &[Property::named("a"), Property::named("a")];
    }

    #[test]
    fn path_renders_alias_and_field() {
        let c = from::<Contact>().named("c").unwrap();
        let age = c.to("age").unwrap();
        assert_eq!(age.to_string(), "c.age");
        assert_eq!(age.alias(), "c");
        assert_eq!(c.backing(), "ContactEntity");
    }

    #[test]
    fn prototype_overrides_fields() {
        let c = from::<Contact>()
            .backing("public.contacts")
            .prototype(Prototype::<ContactRow>::new().field("firstName", "first_name"))
            .named("c")
            .unwrap();
        assert_eq!(c.backing(), "public.contacts");
        assert_eq!(c.to("firstName").unwrap().to_string(), "c.first_name");
        assert_eq!(c.to("age").unwrap().to_string(), "c.age");
    }

    #[test]
    fn prototype_seeded_from_entity_and_listed() {
        let c = from::<Contact>()
            .prototype(Prototype::<ContactRecord>::of_entity())
            .named("c")
            .unwrap();
        let props: Vec<_> = c.properties().collect();
        assert_eq!(
            props,
            vec![
                ("age", "age"),
                ("firstName", "first_name"),
                ("lastName", "last_name"),
            ]
        );
        assert_eq!(c.to("lastName").unwrap().to_string(), "c.last_name");
    }

    #[test]
    fn unknown_property_is_rejected() {
        let c = from::<Contact>().named("c").unwrap();
        assert!(matches!(
            c.to("email"),
            Err(QueryError::UnknownProperty { .. })
        ));

        let err = from::<Contact>()
            .prototype(Prototype::<ContactRow>::new().field("email", "email"))
            .named("c")
            .unwrap_err();
        assert!(matches!(err, QueryError::UnknownProperty { .. }));
    }

    #[test]
    fn conflicting_bindings_are_rejected_at_construction() {
        let twice = from::<Contact>()
            .prototype(
                Prototype::<ContactRow>::new()
                    .field("age", "years")
                    .field("age", "age_years"),
            )
            .named("c");
        assert!(matches!(twice, Err(QueryError::ConflictingBinding(_))));

        let shared = from::<Contact>()
            .prototype(Prototype::<ContactRow>::new().field("lastName", "firstName"))
            .named("c");
        assert!(matches!(shared, Err(QueryError::ConflictingBinding(_))));

        let duplicate = from::<Broken>().named("b");
        assert!(matches!(duplicate, Err(QueryError::ConflictingBinding(_))));
    }

    #[test]
    fn invalid_names_are_rejected() {
        assert!(matches!(
            from::<Contact>().named("1c"),
            Err(QueryError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            from::<Contact>().backing("bad name").named("c"),
            Err(QueryError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn check_bound_distinguishes_foreign_and_duplicate_aliases() {
        let c = from::<Contact>().named("c").unwrap();
        let same = from::<Contact>().named("c").unwrap();
        let other = from::<Contact>().named("d").unwrap();
        let clash = from::<Contact>().backing("Archive").named("c").unwrap();

        let age = c.to("age").unwrap();
        assert!(age.check_bound(same.binding()).is_ok());
        assert!(matches!(
            age.check_bound(other.binding()),
            Err(QueryError::UnboundAlias { .. })
        ));
        assert!(matches!(
            age.check_bound(clash.binding()),
            Err(QueryError::DuplicateAlias(_))
        ));
    }

    #[test]
    fn empty_in_list_is_constant_false() {
        let c = from::<Contact>().named("c").unwrap();
        let age = c.to("age").unwrap();
        assert!(age.is_in(Vec::<i32>::new()).is_constant());
        assert!(!age.is_in([1, 2]).is_constant());
    }
}
