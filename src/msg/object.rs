use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::msg::{Array, Value};

/// Index of an object inside a [`Graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u32);

impl ObjectId {
	/// Arena slot as `usize`.
	pub fn index(self) -> usize {
		self.0 as usize
	}
}

/// Qualified type identity written with every object literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypeName {
	/// Namespace (module or assembly) the type lives in.
	pub namespace: String,
	/// Type name inside the namespace.
	pub name: String,
}

impl TypeName {
	/// Build a type name from parts.
	pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			name: name.into(),
		}
	}
}

impl fmt::Display for TypeName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.namespace.is_empty() {
			f.write_str(&self.name)
		} else {
			write!(f, "{}::{}", self.namespace, self.name)
		}
	}
}

/// Composite object: a named type plus ordered fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
	/// Qualified type.
	pub type_name: TypeName,
	/// Fields in serialization order.
	pub fields: Vec<(String, Value)>,
}

impl Object {
	/// Create an object with no fields.
	pub fn new(type_name: TypeName) -> Self {
		Self {
			type_name,
			fields: Vec::new(),
		}
	}

	/// Borrow a field by name.
	pub fn field(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|(field, _)| field == name).map(|(_, value)| value)
	}

	/// Replace an existing field or append a new one.
	pub fn set_field(&mut self, name: &str, value: Value) {
		match self.fields.iter_mut().find(|(field, _)| field == name) {
			Some((_, slot)) => *slot = value,
			None => self.fields.push((name.to_owned(), value)),
		}
	}
}

/// Root value plus the arena of objects it can reference.
///
/// Two `Value::Object` entries holding the same [`ObjectId`] denote one shared
/// instance; the codec writes it once and back-references every later use.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Graph {
	/// Root value.
	pub root: Value,
	objects: Vec<Object>,
}

impl Graph {
	/// Graph holding `root` and no objects.
	pub fn new(root: Value) -> Self {
		Self { root, objects: Vec::new() }
	}

	/// Graph from a root and a prebuilt arena.
	pub fn from_parts(root: Value, objects: Vec<Object>) -> Self {
		Self { root, objects }
	}

	/// Append an object and return its id.
	pub fn insert(&mut self, object: Object) -> ObjectId {
		let id = ObjectId(self.objects.len() as u32);
		self.objects.push(object);
		id
	}

	/// Borrow an object.
	pub fn get(&self, id: ObjectId) -> Option<&Object> {
		self.objects.get(id.index())
	}

	/// Mutably borrow an object.
	pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Object> {
		self.objects.get_mut(id.index())
	}

	/// All objects in id order.
	pub fn objects(&self) -> &[Object] {
		&self.objects
	}

	/// Split into root and arena.
	pub fn into_parts(self) -> (Value, Vec<Object>) {
		(self.root, self.objects)
	}

	/// Structural equality that ignores arena order.
	///
	/// Objects reachable from the two roots are paired as they are met; two
	/// graphs match when the pairing is one-to-one and every paired object has
	/// the same type and matching fields. Shared and cyclic references must
	/// line up, unreachable arena entries are not compared.
	pub fn deep_eq(&self, other: &Graph) -> bool {
		GraphMatch {
			left: self,
			right: other,
			pairs: HashMap::new(),
			seen: HashSet::new(),
		}
		.value(&self.root, &other.root)
	}
}

struct GraphMatch<'g> {
	left: &'g Graph,
	right: &'g Graph,
	pairs: HashMap<ObjectId, ObjectId>,
	seen: HashSet<ObjectId>,
}

impl GraphMatch<'_> {
	fn value(&mut self, a: &Value, b: &Value) -> bool {
		match (a, b) {
			(Value::Object(a), Value::Object(b)) => self.object(*a, *b),
			(Value::Array(a), Value::Array(b)) => self.array(a, b),
			(Value::MultiArray(a), Value::MultiArray(b)) => a.element == b.element && a.dims == b.dims && self.values(&a.items, &b.items),
			(Value::List(a), Value::List(b)) => self.values(a, b),
			(Value::TypedList { element: ea, items: a }, Value::TypedList { element: eb, items: b }) => ea == eb && self.values(a, b),
			(Value::Set { element: ea, items: a }, Value::Set { element: eb, items: b }) => ea == eb && self.values(a, b),
			(Value::Queue { element: ea, items: a }, Value::Queue { element: eb, items: b }) => ea == eb && self.values(a, b),
			(Value::Stack { element: ea, items: a }, Value::Stack { element: eb, items: b }) => ea == eb && self.values(a, b),
			(Value::Map(a), Value::Map(b)) => self.entries(a, b),
			(
				Value::Dictionary {
					key: ka,
					value: va,
					entries: a,
				},
				Value::Dictionary {
					key: kb,
					value: vb,
					entries: b,
				},
			) => ka == kb && va == vb && self.entries(a, b),
			_ => a == b,
		}
	}

	fn array(&mut self, a: &Array, b: &Array) -> bool {
		match (a, b) {
			(Array::Any(a), Array::Any(b)) => self.values(a, b),
			(Array::Typed { element: ea, items: a }, Array::Typed { element: eb, items: b }) => ea == eb && self.values(a, b),
			_ => a == b,
		}
	}

	fn values(&mut self, a: &[Value], b: &[Value]) -> bool {
		a.len() == b.len() && a.iter().zip(b).all(|(a, b)| self.value(a, b))
	}

	fn entries(&mut self, a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
		a.len() == b.len() && a.iter().zip(b).all(|((ka, va), (kb, vb))| self.value(ka, kb) && self.value(va, vb))
	}

	fn object(&mut self, a: ObjectId, b: ObjectId) -> bool {
		if let Some(&paired) = self.pairs.get(&a) {
			return paired == b;
		}
		if !self.seen.insert(b) {
			return false;
		}
		self.pairs.insert(a, b);
		let (left, right) = (self.left, self.right);
		let (Some(oa), Some(ob)) = (left.get(a), right.get(b)) else {
			return left.get(a).is_none() && right.get(b).is_none();
		};
		oa.type_name == ob.type_name
			&& oa.fields.len() == ob.fields.len()
			&& oa.fields.iter().zip(&ob.fields).all(|((na, va), (nb, vb))| na == nb && self.value(va, vb))
	}
}

impl From<Value> for Graph {
	fn from(root: Value) -> Self {
		Self::new(root)
	}
}
