//! RDF classes and datatypes referenced by generated queries.

/// W3C PROV-O entity class, the type of every provenance snapshot
pub const PROV_ENTITY: &str = "http://www.w3.org/ns/prov#Entity";

/// XSD partial date: year only
pub const XSD_G_YEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";

/// XSD partial date: year and month
pub const XSD_G_YEAR_MONTH: &str = "http://www.w3.org/2001/XMLSchema#gYearMonth";
