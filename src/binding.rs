//! SPARQL result bindings as they arrive from an endpoint.
//!
//! The JSON results format hands us one object per solution, mapping variable
//! names to term descriptors such as
//! `{"type": "literal", "value": "1987", "datatype": ".../XMLSchema#gYear"}`.
//! Endpoints are loosely behaved, so validation happens here at the boundary:
//! a descriptor that is not an object with string `type` and `value` members is
//! kept as an absent descriptor instead of failing the whole document, and
//! rows keep the variable order of the JSON text.

use std::fmt;

use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// The kind of RDF term a descriptor carries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TermType {
    Uri,
    Literal,
    Bnode,
    Other(String),
}

impl TermType {
    pub fn parse(s: &str) -> TermType {
        match s {
            "uri" => TermType::Uri,
            "literal" => TermType::Literal,
            "bnode" => TermType::Bnode,
            other => TermType::Other(other.to_string()),
        }
    }
    pub fn as_str(&self) -> &str {
        match self {
            TermType::Uri => "uri",
            TermType::Literal => "literal",
            TermType::Bnode => "bnode",
            TermType::Other(s) => s,
        }
    }
}
impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
impl Serialize for TermType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One bound value in a result row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueDescriptor {
    pub value: String,
    #[serde(rename = "type")]
    pub term: TermType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(rename = "xml:lang", skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl ValueDescriptor {
    pub fn new(term: TermType, value: impl Into<String>) -> Self {
        Self { value: value.into(), term, datatype: None, lang: None }
    }
    pub fn literal(value: impl Into<String>) -> Self {
        Self::new(TermType::Literal, value)
    }
    pub fn typed_literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::literal(value).with_datatype(datatype)
    }
    pub fn uri(value: impl Into<String>) -> Self {
        Self::new(TermType::Uri, value)
    }
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
    pub fn is_literal(&self) -> bool {
        self.term == TermType::Literal
    }

    /// Validates a raw JSON descriptor. Anything lacking a string `type` or
    /// `value` yields `None`; non-string `datatype`/`lang` members are ignored.
    pub fn from_json(raw: &Value) -> Option<ValueDescriptor> {
        let object = raw.as_object()?;
        let term = object.get("type")?.as_str()?;
        let value = object.get("value")?.as_str()?;
        let datatype = object.get("datatype").and_then(Value::as_str).map(String::from);
        let lang = object
            .get("xml:lang")
            .or_else(|| object.get("lang"))
            .and_then(Value::as_str)
            .map(String::from);
        Some(ValueDescriptor { value: value.to_string(), term: TermType::parse(term), datatype, lang })
    }
}

/// A single solution: variable names mapped to descriptors, in document order.
/// A `None` descriptor marks a variable whose JSON was malformed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultRow {
    fields: Vec<(String, Option<ValueDescriptor>)>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }
    /// Builder form of [`ResultRow::insert`].
    pub fn with(mut self, name: impl Into<String>, descriptor: ValueDescriptor) -> Self {
        self.insert(name, Some(descriptor));
        self
    }
    /// Keys are unique; binding an existing name replaces its descriptor in place.
    pub fn insert(&mut self, name: impl Into<String>, descriptor: Option<ValueDescriptor>) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = descriptor,
            None => self.fields.push((name, descriptor)),
        }
    }
    pub fn get(&self, name: &str) -> Option<&ValueDescriptor> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, d)| d.as_ref())
    }
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&ValueDescriptor>)> {
        self.fields.iter().map(|(n, d)| (n.as_str(), d.as_ref()))
    }
    /// Well-formed descriptors only, in row order.
    pub fn values(&self) -> impl Iterator<Item = &ValueDescriptor> {
        self.fields.iter().filter_map(|(_, d)| d.as_ref())
    }
    pub fn len(&self) -> usize {
        self.fields.len()
    }
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for ResultRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, descriptor) in &self.fields {
            map.serialize_entry(name, descriptor)?;
        }
        map.end()
    }
}

// Accepts scalars and nulls in place of a container, yielding `$absent`.
macro_rules! absent_on_scalars {
    ($absent:expr) => {
        fn visit_unit<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok($absent)
        }
        fn visit_none<E: de::Error>(self) -> std::result::Result<Self::Value, E> {
            Ok($absent)
        }
        fn visit_bool<E: de::Error>(self, _: bool) -> std::result::Result<Self::Value, E> {
            Ok($absent)
        }
        fn visit_i64<E: de::Error>(self, _: i64) -> std::result::Result<Self::Value, E> {
            Ok($absent)
        }
        fn visit_u64<E: de::Error>(self, _: u64) -> std::result::Result<Self::Value, E> {
            Ok($absent)
        }
        fn visit_f64<E: de::Error>(self, _: f64) -> std::result::Result<Self::Value, E> {
            Ok($absent)
        }
        fn visit_str<E: de::Error>(self, _: &str) -> std::result::Result<Self::Value, E> {
            Ok($absent)
        }
    };
}

fn drain_seq<'de, A: SeqAccess<'de>>(mut access: A) -> std::result::Result<(), A::Error> {
    while access.next_element::<IgnoredAny>()?.is_some() {}
    Ok(())
}

fn drain_map<'de, A: MapAccess<'de>>(mut access: A) -> std::result::Result<(), A::Error> {
    while access.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
    Ok(())
}

struct ResultRowVisitor;

impl<'de> Visitor<'de> for ResultRowVisitor {
    type Value = ResultRow;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a SPARQL binding object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<ResultRow, A::Error> {
        let mut row = ResultRow::new();
        while let Some((name, raw)) = access.next_entry::<String, Value>()? {
            row.insert(name, ValueDescriptor::from_json(&raw));
        }
        Ok(row)
    }

    // rows that are not objects carry no bindings
    fn visit_seq<A: SeqAccess<'de>>(self, access: A) -> std::result::Result<ResultRow, A::Error> {
        drain_seq(access)?;
        Ok(ResultRow::new())
    }
    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<ResultRow, D::Error> {
        deserializer.deserialize_any(ResultRowVisitor)
    }
    absent_on_scalars!(ResultRow::new());
}

impl<'de> Deserialize<'de> for ResultRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<ResultRow, D::Error> {
        deserializer.deserialize_any(ResultRowVisitor)
    }
}

struct RowsVisitor;

impl<'de> Visitor<'de> for RowsVisitor {
    type Value = Option<Vec<ResultRow>>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "an array of SPARQL bindings")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> std::result::Result<Self::Value, A::Error> {
        let mut rows = Vec::new();
        while let Some(row) = access.next_element::<ResultRow>()? {
            rows.push(row);
        }
        Ok(Some(rows))
    }
    fn visit_map<A: MapAccess<'de>>(self, access: A) -> std::result::Result<Self::Value, A::Error> {
        drain_map(access)?;
        Ok(None)
    }
    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error> {
        deserializer.deserialize_any(RowsVisitor)
    }
    absent_on_scalars!(None);
}

/// A `bindings` array. Anything other than an array reads as absent.
/// Usable with `#[serde(deserialize_with = "...")]`.
pub fn lenient_rows<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Vec<ResultRow>>, D::Error> {
    deserializer.deserialize_any(RowsVisitor)
}

/// `head` section. A non-object head has no vars, and non-string vars are skipped.
#[derive(Debug, Clone, Default)]
pub struct Head {
    pub vars: Vec<String>,
}

impl<'de> Deserialize<'de> for Head {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Head, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let vars = raw
            .get("vars")
            .and_then(Value::as_array)
            .map(|vars| vars.iter().filter_map(Value::as_str).map(String::from).collect())
            .unwrap_or_default();
        Ok(Head { vars })
    }
}

/// `results` section. A non-object section, or one whose `bindings` is not an array, has no rows.
#[derive(Debug, Clone, Default)]
pub struct Results {
    pub bindings: Option<Vec<ResultRow>>,
}

struct ResultsVisitor;

impl<'de> Visitor<'de> for ResultsVisitor {
    type Value = Results;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a SPARQL results section")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Results, A::Error> {
        let mut results = Results::default();
        while let Some(key) = access.next_key::<String>()? {
            if key == "bindings" {
                results.bindings = access.next_value_seed(RowsSeed)?;
            } else {
                access.next_value::<IgnoredAny>()?;
            }
        }
        Ok(results)
    }
    fn visit_seq<A: SeqAccess<'de>>(self, access: A) -> std::result::Result<Results, A::Error> {
        drain_seq(access)?;
        Ok(Results::default())
    }
    absent_on_scalars!(Results::default());
}

impl<'de> Deserialize<'de> for Results {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Results, D::Error> {
        deserializer.deserialize_any(ResultsVisitor)
    }
}

struct RowsSeed;

impl<'de> de::DeserializeSeed<'de> for RowsSeed {
    type Value = Option<Vec<ResultRow>>;
    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error> {
        lenient_rows(deserializer)
    }
}

/// A complete SPARQL JSON results document (`head` + `results.bindings`).
/// Only a document that is not a JSON object is rejected; ill-typed
/// sections inside it read as empty.
#[derive(Debug, Clone, Default)]
pub struct SparqlResults {
    pub head: Option<Head>,
    pub results: Option<Results>,
}

struct SparqlResultsVisitor;

impl<'de> Visitor<'de> for SparqlResultsVisitor {
    type Value = SparqlResults;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "a SPARQL JSON results object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<SparqlResults, A::Error> {
        let mut document = SparqlResults::default();
        while let Some(key) = access.next_key::<String>()? {
            match key.as_str() {
                "head" => document.head = access.next_value::<Option<Head>>()?,
                "results" => document.results = access.next_value::<Option<Results>>()?,
                _ => {
                    access.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(document)
    }
}

impl<'de> Deserialize<'de> for SparqlResults {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<SparqlResults, D::Error> {
        deserializer.deserialize_map(SparqlResultsVisitor)
    }
}

impl SparqlResults {
    pub fn from_json(text: &str) -> Result<SparqlResults> {
        Ok(serde_json::from_str(text)?)
    }
    pub fn vars(&self) -> &[String] {
        self.head.as_ref().map(|h| h.vars.as_slice()).unwrap_or(&[])
    }
    pub fn bindings(&self) -> &[ResultRow] {
        self.results
            .as_ref()
            .and_then(|r| r.bindings.as_deref())
            .unwrap_or(&[])
    }
    pub fn into_bindings(self) -> Vec<ResultRow> {
        self.results.and_then(|r| r.bindings).unwrap_or_default()
    }
}
