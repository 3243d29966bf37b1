//! Described types shared by the unit tests.

use alloc::collections::BTreeMap;
use alloc::sync::Arc;
use core::any::Any;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::access::{Reader, Writer};
use crate::convert::Converter;
use crate::error::{AccessError, ConvertError};
use crate::info::{Accessor, CollectionInfo, CollectionTraits, ConstructorInfo, ConstructorProperties};
use crate::info::{CustomAttributes, GenericTypeInfoCell, Ignore, NamedField, NonGenericTypeInfoCell};
use crate::info::{ParamInfo, Primitive, PrimitiveInfo, StructInfo, TypeInfo, Typed, VirtualField};
use crate::info::{VirtualObject, VirtualObjects, Visibility, WithConverter};
use crate::value::{ToValue, Value, ValueMap};

// -----------------------------------------------------------------------------
// Helpers

pub(crate) fn struct_info<T: Typed>() -> &'static StructInfo {
    T::type_info().as_struct().expect("fixture is a struct")
}

pub(crate) fn map<const N: usize>(entries: [(&str, Value); N]) -> ValueMap {
    entries
        .into_iter()
        .map(|(key, value)| (key.into(), value))
        .collect()
}

fn attrs<T: Any + Send + Sync>(value: T) -> CustomAttributes {
    CustomAttributes::new().with_attribute(value)
}

macro_rules! impl_struct {
    ($ty:ty => $build:expr) => {
        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Struct($build))
            }
        }
    };
}

/// Always reads the same document.
pub(crate) struct ConstReader(pub ValueMap);

impl Reader for ConstReader {
    fn read(&self, _: &dyn Any) -> Result<Value, AccessError> {
        Ok(Value::Map(self.0.clone()))
    }

    fn static_type(&self) -> &'static TypeInfo {
        ValueMap::type_info()
    }

    fn attributes(&self) -> &CustomAttributes {
        CustomAttributes::empty()
    }
}

/// Always reads `1`.
pub(crate) struct ScalarReader;

impl Reader for ScalarReader {
    fn read(&self, _: &dyn Any) -> Result<Value, AccessError> {
        Ok(Value::Int(1))
    }

    fn static_type(&self) -> &'static TypeInfo {
        i64::type_info()
    }

    fn attributes(&self) -> &CustomAttributes {
        CustomAttributes::empty()
    }
}

/// Records every written value.
#[derive(Default)]
pub(crate) struct RecordingWriter {
    seen: Mutex<Vec<Value>>,
}

impl RecordingWriter {
    pub(crate) fn seen(&self) -> Vec<Value> {
        self.seen.lock().unwrap().clone()
    }
}

impl Writer for RecordingWriter {
    fn write(&self, _: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        self.seen.lock().unwrap().push(value);
        Ok(())
    }

    fn static_type(&self) -> &'static TypeInfo {
        ValueMap::type_info()
    }

    fn attributes(&self) -> &CustomAttributes {
        CustomAttributes::empty()
    }
}

// -----------------------------------------------------------------------------
// Converters

/// Writes a string map as `k=v;k=v`.
#[derive(Default)]
pub(crate) struct Pairs;

impl Converter for Pairs {
    fn to_wire(&self, value: Value) -> Result<Value, ConvertError> {
        let Value::Map(entries) = value else {
            return Err(ConvertError::new("expected a map"));
        };
        let pairs = entries
            .iter()
            .map(|(key, value)| format!("{key}={}", value.as_str().unwrap_or_default()))
            .collect::<Vec<_>>();
        Ok(Value::String(pairs.join(";")))
    }

    fn from_wire(&self, value: Value) -> Result<Value, ConvertError> {
        let text = value.as_str().ok_or(ConvertError::new("expected a string"))?;
        let entries = text
            .split(';')
            .filter_map(|pair| pair.split_once('='))
            .map(|(key, value)| (key.into(), Value::from(value)))
            .collect::<ValueMap>();
        Ok(Value::Map(entries))
    }
}

/// Integers written as decimal strings.
#[derive(Default)]
pub(crate) struct Decimal;

impl Converter for Decimal {
    fn to_wire(&self, value: Value) -> Result<Value, ConvertError> {
        match value {
            Value::Int(v) => Ok(Value::String(v.to_string())),
            other => Ok(other),
        }
    }

    fn from_wire(&self, value: Value) -> Result<Value, ConvertError> {
        let text = value.as_str().ok_or(ConvertError::new("expected a string"))?;
        text.parse::<i64>()
            .map(Value::Int)
            .map_err(|err| ConvertError::new(err.to_string()))
    }
}

// -----------------------------------------------------------------------------
// Non-struct descriptors

/// An arbitrary-precision integer.
pub(crate) struct Big(pub String);

impl Typed for Big {
    fn type_info() -> &'static TypeInfo {
        static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
        CELL.get_or_init(|| TypeInfo::Primitive(PrimitiveInfo::new::<Self>(Primitive::BigInteger)))
    }
}

impl ToValue for Big {
    /// Written as its digits.
    fn to_value(&self) -> Value {
        Value::String(self.0.clone())
    }
}

/// A collection that is neither a list, a set nor a queue.
pub(crate) struct Bag<T>(pub Vec<T>);

impl<T: Typed> Typed for Bag<T> {
    fn type_info() -> &'static TypeInfo {
        static CELL: GenericTypeInfoCell = GenericTypeInfoCell::new();
        CELL.get_or_insert::<Self>(|| {
            TypeInfo::Collection(CollectionInfo::new::<Self, T>(CollectionTraits::COLLECTION))
        })
    }
}

impl<T: ToValue> ToValue for Bag<T> {
    fn to_value(&self) -> Value {
        Value::Seq(self.0.iter().map(ToValue::to_value).collect())
    }
}

// -----------------------------------------------------------------------------
// Account

/// Fields and accessors, `owner` has both.
pub(crate) struct Account {
    pub owner: String,
    pub cents: i64,
}

impl Account {
    pub(crate) fn new(owner: &str, cents: i64) -> Self {
        Self {
            owner: owner.into(),
            cents,
        }
    }
}

impl_struct!(Account => StructInfo::new::<Account>()
    .with_field(NamedField::read_only::<Account, String>("owner", |a| &a.owner))
    .with_field(NamedField::new::<Account, i64>("cents", |a| &a.cents, |a| &mut a.cents))
    .with_accessor(Accessor::property::<Account, f64>(
        "balance",
        |a| a.cents as f64 / 100.0,
        |a, v| a.cents = (v * 100.0).round() as i64,
    ))
    .with_accessor(Accessor::getter::<Account, String>("label", |a| format!("{}: {}", a.owner, a.cents)))
    .with_accessor(Accessor::getter::<Account, String>("owner", |a| a.owner.to_uppercase())));

// -----------------------------------------------------------------------------
// Place

/// `lat` and `lon` presented under `address.geo`.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Place {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl_struct!(Place => StructInfo::new::<Place>()
    .with_field(NamedField::new::<Place, String>("name", |p| &p.name, |p| &mut p.name))
    .with_field(NamedField::new::<Place, f64>("lat", |p| &p.lat, |p| &mut p.lat))
    .with_field(NamedField::new::<Place, f64>("lon", |p| &p.lon, |p| &mut p.lon))
    .with_default::<Place>()
    .with_attributes(attrs(
        VirtualObject::new(&["address", "geo"])
            .with_field(VirtualField::new("lat"))
            .with_field(VirtualField::new("lon")),
    )));

// -----------------------------------------------------------------------------
// Profile

/// One property per structural flag and ignore marker.
pub(crate) struct Profile {
    pub name: String,
    pub scores: Box<[f64]>,
    pub tags: Vec<String>,
    pub history: Option<Vec<i64>>,
    pub extras: HashMap<String, i64>,
    pub labels: BTreeMap<String, String>,
    pub secret: String,
    pub legacy: String,
    pub meta_class: String,
}

impl Profile {
    pub(crate) fn sample() -> Self {
        Self {
            name: "ann".into(),
            scores: Box::new([1.0]),
            tags: vec!["a".into()],
            history: None,
            extras: HashMap::new(),
            labels: BTreeMap::from([("en".into(), "hello".into())]),
            secret: "s".into(),
            legacy: "l".into(),
            meta_class: "m".into(),
        }
    }
}

impl_struct!(Profile => StructInfo::new::<Profile>()
    .with_field(NamedField::new::<Profile, String>("name", |p| &p.name, |p| &mut p.name))
    .with_field(NamedField::new::<Profile, Box<[f64]>>("scores", |p| &p.scores, |p| &mut p.scores))
    .with_field(NamedField::new::<Profile, Vec<String>>("tags", |p| &p.tags, |p| &mut p.tags))
    .with_field(NamedField::new::<Profile, Option<Vec<i64>>>("history", |p| &p.history, |p| &mut p.history))
    .with_field(NamedField::new::<Profile, HashMap<String, i64>>("extras", |p| &p.extras, |p| &mut p.extras))
    .with_field(
        NamedField::new::<Profile, BTreeMap<String, String>>("labels", |p| &p.labels, |p| &mut p.labels)
            .with_attributes(attrs(WithConverter::of::<Pairs>())),
    )
    .with_field(
        NamedField::new::<Profile, String>("secret", |p| &p.secret, |p| &mut p.secret)
            .with_attributes(attrs(Ignore::ALWAYS)),
    )
    .with_field(
        NamedField::new::<Profile, String>("legacy", |p| &p.legacy, |p| &mut p.legacy)
            .with_attributes(attrs(Ignore::until(2))),
    )
    .with_field(NamedField::new::<Profile, String>("metaClass", |p| &p.meta_class, |p| &mut p.meta_class)));

// -----------------------------------------------------------------------------
// Constructors

/// A named two-argument constructor next to a nullary one.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Point {
    pub y: f64,
    pub x: f64,
}

impl_struct!(Point => StructInfo::new::<Point>()
    .with_field(NamedField::new::<Point, f64>("y", |p| &p.y, |p| &mut p.y))
    .with_field(NamedField::new::<Point, f64>("x", |p| &p.x, |p| &mut p.x))
    .with_constructor(ConstructorInfo::nullary::<Point>(Point::default))
    .with_constructor(
        ConstructorInfo::new::<Point, _>(
            [ParamInfo::new::<f64>(), ParamInfo::new::<f64>()],
            |args| Ok(Point { x: args.next()?, y: args.next()? }),
        )
        .with_attributes(attrs(ConstructorProperties(&["x", "y"]))),
    ));

/// Only constructible from a converted argument.
pub(crate) struct Sealed {
    code: i32,
}

impl Sealed {
    pub(crate) fn code(&self) -> i32 {
        self.code
    }
}

impl_struct!(Sealed => StructInfo::new::<Sealed>()
    .with_field(NamedField::read_only::<Sealed, i32>("code", |s| &s.code))
    .with_constructor(
        ConstructorInfo::new::<Sealed, _>(
            [ParamInfo::new::<i32>().with_attributes(attrs(WithConverter::of::<Decimal>()))],
            |args| Ok(Sealed { code: args.next()? }),
        )
        .with_attributes(attrs(ConstructorProperties(&["code"]))),
    ));

/// Private state behind a hidden constructor.
pub(crate) struct Hidden {
    secret: String,
}

impl_struct!(Hidden => StructInfo::new::<Hidden>()
    .with_field(NamedField::new::<Hidden, String>("secret", |h| &h.secret, |h| &mut h.secret))
    .with_constructor(
        ConstructorInfo::nullary::<Hidden>(|| Hidden { secret: String::new() })
            .with_visibility(Visibility::Hidden),
    ));

// -----------------------------------------------------------------------------
// Configuration errors

pub(crate) struct NoPath {
    a: i32,
}

impl_struct!(NoPath => StructInfo::new::<NoPath>()
    .with_field(NamedField::new::<NoPath, i32>("a", |n| &n.a, |n| &mut n.a))
    .with_attributes(attrs(VirtualObject::new(&[]).with_field(VirtualField::new("a")))));

pub(crate) struct BadArity {
    a: i32,
    b: i32,
}

impl_struct!(BadArity => StructInfo::new::<BadArity>()
    .with_field(NamedField::new::<BadArity, i32>("a", |n| &n.a, |n| &mut n.a))
    .with_field(NamedField::new::<BadArity, i32>("b", |n| &n.b, |n| &mut n.b))
    .with_constructor(
        ConstructorInfo::new::<BadArity, _>(
            [ParamInfo::new::<i32>(), ParamInfo::new::<i32>()],
            |args| Ok(BadArity { a: args.next()?, b: args.next()? }),
        )
        .with_attributes(attrs(ConstructorProperties(&["a"]))),
    ));

pub(crate) struct BrokenConverter {
    when: String,
}

fn broken() -> Result<Arc<dyn Converter>, ConvertError> {
    Err(ConvertError::new("no clock available"))
}

impl_struct!(BrokenConverter => StructInfo::new::<BrokenConverter>()
    .with_field(
        NamedField::new::<BrokenConverter, String>("when", |b| &b.when, |b| &mut b.when)
            .with_attributes(attrs(WithConverter::new("Clock", broken))),
    ));

// -----------------------------------------------------------------------------
// Virtual composition

/// `meta` built from three declarations, two of them under `meta.stats`.
#[derive(Debug, Default, PartialEq)]
pub(crate) struct Article {
    pub title: String,
    pub author: String,
    pub editor: Option<String>,
    pub views: i64,
    pub likes: i64,
}

impl_struct!(Article => StructInfo::new::<Article>()
    .with_field(NamedField::new::<Article, String>("title", |a| &a.title, |a| &mut a.title))
    .with_field(NamedField::new::<Article, String>("author", |a| &a.author, |a| &mut a.author))
    .with_field(NamedField::new::<Article, Option<String>>("editor", |a| &a.editor, |a| &mut a.editor))
    .with_field(NamedField::new::<Article, i64>("views", |a| &a.views, |a| &mut a.views))
    .with_field(
        NamedField::new::<Article, i64>("likes", |a| &a.likes, |a| &mut a.likes)
            .with_attributes(attrs(Ignore::until(2))),
    )
    .with_default::<Article>()
    .with_attributes(
        CustomAttributes::new()
            .with_attribute(VirtualObjects(vec![
                VirtualObject::new(&["meta"])
                    .with_field(VirtualField::new("author"))
                    .with_field(VirtualField::new("editor")),
                VirtualObject::new(&["meta", "stats"]).with_field(VirtualField::read_only("views")),
            ]))
            .with_attribute(VirtualObject::new(&["meta", "stats"]).with_field(VirtualField::new("likes"))),
    ));

/// Two declarations claiming the same flat key.
#[derive(Default)]
pub(crate) struct Clash {
    pub a: String,
}

impl_struct!(Clash => StructInfo::new::<Clash>()
    .with_field(NamedField::new::<Clash, String>("a", |c| &c.a, |c| &mut c.a))
    .with_attributes(attrs(VirtualObjects(vec![
        VirtualObject::new(&["meta"]).with_field(VirtualField::new("a")),
        VirtualObject::new(&["meta"]).with_field(VirtualField::new("a")),
    ]))));

/// A literal map property sharing its name with a virtual object.
#[derive(Default)]
pub(crate) struct Folded {
    pub meta: ValueMap,
    pub code: i32,
}

impl_struct!(Folded => StructInfo::new::<Folded>()
    .with_field(NamedField::new::<Folded, ValueMap>("meta", |f| &f.meta, |f| &mut f.meta))
    .with_field(NamedField::new::<Folded, i32>("code", |f| &f.code, |f| &mut f.code))
    .with_attributes(attrs(VirtualObject::new(&["meta"]).with_field(VirtualField::new("code")))));

/// An array member of a virtual object.
#[derive(Default)]
pub(crate) struct Series {
    pub values: Box<[f64]>,
    pub label: String,
}

impl_struct!(Series => StructInfo::new::<Series>()
    .with_field(NamedField::new::<Series, Box<[f64]>>("values", |s| &s.values, |s| &mut s.values))
    .with_field(NamedField::new::<Series, String>("label", |s| &s.label, |s| &mut s.label))
    .with_attributes(attrs(VirtualObject::new(&["data"]).with_field(VirtualField::new("values")))));

/// A folded literal property hidden from version 2 on.
#[derive(Default)]
pub(crate) struct MaskedFold {
    pub meta: ValueMap,
    pub code: i32,
}

impl_struct!(MaskedFold => StructInfo::new::<MaskedFold>()
    .with_field(
        NamedField::new::<MaskedFold, ValueMap>("meta", |f| &f.meta, |f| &mut f.meta)
            .with_attributes(attrs(Ignore::until(2))),
    )
    .with_field(NamedField::new::<MaskedFold, i32>("code", |f| &f.code, |f| &mut f.code))
    .with_attributes(attrs(VirtualObject::new(&["meta"]).with_field(VirtualField::new("code")))));

/// A converted member of a virtual object.
#[derive(Default)]
pub(crate) struct Tagged {
    pub name: String,
    pub labels: BTreeMap<String, String>,
}

impl_struct!(Tagged => StructInfo::new::<Tagged>()
    .with_field(NamedField::new::<Tagged, String>("name", |t| &t.name, |t| &mut t.name))
    .with_field(
        NamedField::new::<Tagged, BTreeMap<String, String>>("labels", |t| &t.labels, |t| &mut t.labels)
            .with_attributes(attrs(WithConverter::of::<Pairs>())),
    )
    .with_attributes(attrs(VirtualObject::new(&["extra"]).with_field(VirtualField::new("labels")))));

// -----------------------------------------------------------------------------
// Constructor selection

/// Records which constructor built it.
#[derive(Default)]
pub(crate) struct Shy {
    pub origin: &'static str,
}

impl_struct!(Shy => StructInfo::new::<Shy>()
    .with_constructor(
        ConstructorInfo::nullary::<Shy>(|| Shy { origin: "hidden" }).with_visibility(Visibility::Hidden),
    )
    .with_constructor(ConstructorInfo::nullary::<Shy>(|| Shy { origin: "first" }))
    .with_constructor(ConstructorInfo::nullary::<Shy>(|| Shy { origin: "second" })));

/// A hidden zero-argument constructor next to the `Default` factory.
#[derive(Default)]
pub(crate) struct Backdoor {
    pub origin: &'static str,
}

impl_struct!(Backdoor => StructInfo::new::<Backdoor>()
    .with_constructor(
        ConstructorInfo::nullary::<Backdoor>(|| Backdoor { origin: "hidden" })
            .with_visibility(Visibility::Hidden),
    )
    .with_default::<Backdoor>());

/// A hidden parameter-named constructor next to the `Default` factory.
#[derive(Default)]
pub(crate) struct Guarded {
    pub code: i32,
}

impl_struct!(Guarded => StructInfo::new::<Guarded>()
    .with_field(NamedField::new::<Guarded, i32>("code", |g| &g.code, |g| &mut g.code))
    .with_constructor(
        ConstructorInfo::new::<Guarded, _>([ParamInfo::new::<i32>()], |args| {
            Ok(Guarded { code: args.next()? })
        })
        .with_visibility(Visibility::Hidden)
        .with_attributes(attrs(ConstructorProperties(&["code"]))),
    )
    .with_default::<Guarded>());

/// A constructor parameter whose converter cannot be created.
pub(crate) struct BrokenParam {
    when: String,
}

impl_struct!(BrokenParam => StructInfo::new::<BrokenParam>()
    .with_field(NamedField::read_only::<BrokenParam, String>("when", |b| &b.when))
    .with_constructor(
        ConstructorInfo::new::<BrokenParam, _>(
            [ParamInfo::new::<String>().with_attributes(attrs(WithConverter::new("Clock", broken)))],
            |args| Ok(BrokenParam { when: args.next()? }),
        )
        .with_attributes(attrs(ConstructorProperties(&["when"]))),
    ));
