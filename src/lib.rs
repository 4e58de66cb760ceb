//! Sparqline – turns SPARQL result bindings into timeline entries.
//!
//! SPARQL endpoints such as Wikidata answer `SELECT` queries with rows of
//! loosely typed bindings. Sparqline finds the value in each row that can
//! place it on a timeline, resolves it to an instant and picks a label, so
//! that the rows can be handed to a timeline widget (vis-timeline).
//!
//! ## Modules
//! * [`binding`] – Result rows and value descriptors, validated while deserializing.
//! * [`datatype`] – Instant parsing for bare years, dates and date-times.
//! * [`classify`] – Which values are date-like, and whether a batch can form a timeline at all.
//! * [`mapping`] – Rows to [`mapping::TimelineEntry`] values.
//! * [`view`] – The presentation shell: fallback state, option merging, click
//!   bridging and the scoped widget lifecycle.
//! * [`settings`] – Configuration via the `config` crate.
//! * [`server`] – An HTTP endpoint serving vis-timeline payloads.
//!
//! ## Quick Start
//! ```
//! use sparqline::binding::SparqlResults;
//! use sparqline::classify::can_form_timeline;
//! use sparqline::mapping::map_rows_to_entries;
//! let doc = SparqlResults::from_json(r#"{"results": {"bindings": [
//!     {"title": {"type": "literal", "value": "Reservoir Dogs"},
//!      "released": {"type": "literal", "value": "1992-09-10T00:00:00Z",
//!                   "datatype": "http://www.w3.org/2001/XMLSchema#dateTime"}}
//! ]}}"#).unwrap();
//! assert!(can_form_timeline(doc.bindings()));
//! let entries = map_rows_to_entries(doc.bindings());
//! assert_eq!(entries[0].label, "Reservoir Dogs");
//! ```

pub mod binding;
pub mod classify;
pub mod datatype;
pub mod error;
pub mod mapping;
pub mod server;
pub mod settings;
pub mod view;
