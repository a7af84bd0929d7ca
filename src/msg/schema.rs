use std::collections::HashMap;

use crate::msg::{DecodeError, Graph, Object, ObjectId, TypeName, Value};

/// Rust type that maps onto a BinMsg object literal.
///
/// The field list replaces runtime reflection: `to_fields` yields the fields in
/// wire order and `set_field` receives decoded values by name.
pub trait Serializable: Default {
	/// Namespace written with every instance.
	const NAMESPACE: &'static str;
	/// Type name written with every instance.
	const TYPE_NAME: &'static str;

	/// Fields in serialization order.
	fn to_fields(&self) -> Vec<(&'static str, Value)>;

	/// Assign one decoded field; `false` when the name or value shape does not fit.
	fn set_field(&mut self, name: &str, value: Value) -> bool;

	/// Qualified type name.
	fn type_name() -> TypeName {
		TypeName::new(Self::NAMESPACE, Self::TYPE_NAME)
	}
}

/// Declared fields of one object type, with their default values.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSchema {
	/// Qualified type.
	pub type_name: TypeName,
	/// Field names in declaration order with default values.
	pub fields: Vec<(String, Value)>,
}

impl TypeSchema {
	/// Schema with the given fields, all defaulting to null.
	pub fn new(type_name: TypeName, fields: &[&str]) -> Self {
		Self {
			type_name,
			fields: fields.iter().map(|name| ((*name).to_owned(), Value::Null)).collect(),
		}
	}

	/// Schema derived from a [`Serializable`] type's default instance.
	pub fn of<T: Serializable>() -> Self {
		Self {
			type_name: T::type_name(),
			fields: T::default().to_fields().into_iter().map(|(name, value)| (name.to_owned(), value)).collect(),
		}
	}

	fn declares(&self, field: &str) -> bool {
		self.fields.iter().any(|(name, _)| name == field)
	}
}

/// Type lookup used when decoding object literals.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
	types: HashMap<TypeName, TypeSchema>,
	permissive: bool,
}

impl TypeRegistry {
	/// Empty registry that rejects every object type.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registry that accepts unknown types as dynamic records.
	pub fn permissive() -> Self {
		Self {
			types: HashMap::new(),
			permissive: true,
		}
	}

	/// Whether unknown types decode as dynamic records.
	pub fn is_permissive(&self) -> bool {
		self.permissive
	}

	/// Register an explicit schema, replacing any previous one for the same type.
	pub fn register(&mut self, schema: TypeSchema) -> &mut Self {
		self.types.insert(schema.type_name.clone(), schema);
		self
	}

	/// Register a [`Serializable`] type.
	pub fn register_type<T: Serializable>(&mut self) -> &mut Self {
		self.register(TypeSchema::of::<T>())
	}

	/// Look up a schema.
	pub fn schema(&self, type_name: &TypeName) -> Option<&TypeSchema> {
		self.types.get(type_name)
	}

	/// Default-construct an instance of `type_name`.
	pub(crate) fn instantiate(&self, type_name: &TypeName) -> Result<Object, DecodeError> {
		match self.types.get(type_name) {
			Some(schema) => Ok(Object {
				type_name: type_name.clone(),
				fields: schema.fields.clone(),
			}),
			None if self.permissive => Ok(Object::new(type_name.clone())),
			None => Err(DecodeError::UnresolvableType {
				namespace: type_name.namespace.clone(),
				name: type_name.name.clone(),
			}),
		}
	}

	/// Check that a decoded field name is declared for `type_name`.
	pub(crate) fn check_field(&self, type_name: &TypeName, field: &str) -> Result<(), DecodeError> {
		match self.types.get(type_name) {
			Some(schema) if !schema.declares(field) => Err(DecodeError::UnknownField {
				type_name: type_name.to_string(),
				field: field.to_owned(),
			}),
			_ => Ok(()),
		}
	}
}

impl Graph {
	/// Store a typed value as an object and return its id.
	pub fn insert_serializable<T: Serializable>(&mut self, value: &T) -> ObjectId {
		let fields = value.to_fields().into_iter().map(|(name, value)| (name.to_owned(), value)).collect();
		self.insert(Object {
			type_name: T::type_name(),
			fields,
		})
	}

	/// Rebuild a typed value from the object at `id`.
	pub fn extract<T: Serializable>(&self, id: ObjectId) -> Result<T, DecodeError> {
		let expected = T::type_name();
		let object = self.get(id).ok_or(DecodeError::MalformedBackReference {
			kind: "object",
			id: id.index(),
			registered: self.objects().len(),
		})?;
		if object.type_name != expected {
			return Err(DecodeError::UnresolvableType {
				namespace: object.type_name.namespace.clone(),
				name: object.type_name.name.clone(),
			});
		}

		let mut out = T::default();
		for (name, value) in &object.fields {
			let got = value.kind();
			if !out.set_field(name, value.clone()) {
				return Err(DecodeError::FieldRejected {
					type_name: expected.to_string(),
					field: name.clone(),
					got,
				});
			}
		}
		Ok(out)
	}
}
