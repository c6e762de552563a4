//! PyO3 bindings for the dealmatch core.
//!
//! Exposes the Rust pipeline to the Python web service:
//! - Price normalization and keyword extraction
//! - Listing matching and deal resolution
//! - Full search-result building
//!
//! Listing collections are Python lists whose items are either `Listing`
//! objects or plain dicts with `name`, `price`, `seller`, `image_url` and
//! `product_url` keys. Results come back as `Comparison` and
//! `SearchResults` objects.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::collections::HashSet;

use dealmatch_core::{
    Comparison as RustComparison, Config as RustConfig, Error as RustError,
    Listing as RustListing, RawListing, SearchResults as RustSearchResults,
    Source as RustSource, Winner as RustWinner,
};
use dealmatch_ingestion::{keywords, normalize_price};
use dealmatch_matching::{name_similarity, Matcher as RustMatcher};
use tracing_subscriber::EnvFilter;

fn to_py_err(err: RustError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

// ============================================================================
// Python-exposed Types
// ============================================================================

/// Site a listing was scraped from.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, PartialEq)]
pub enum Source {
    SourceA,
    SourceB,
}

#[pymethods]
impl Source {
    fn __str__(&self) -> &'static str {
        RustSource::from(*self).as_str()
    }
}

impl From<Source> for RustSource {
    fn from(s: Source) -> Self {
        match s {
            Source::SourceA => RustSource::SourceA,
            Source::SourceB => RustSource::SourceB,
        }
    }
}

impl From<RustSource> for Source {
    fn from(s: RustSource) -> Self {
        match s {
            RustSource::SourceA => Source::SourceA,
            RustSource::SourceB => Source::SourceB,
        }
    }
}

/// Side of a matched pair with the lower price.
#[pyclass(eq, eq_int)]
#[derive(Clone, Copy, PartialEq)]
pub enum Winner {
    SourceA,
    SourceB,
    Tie,
}

impl Winner {
    fn as_str(&self) -> &'static str {
        match self {
            Winner::SourceA => "source_a",
            Winner::SourceB => "source_b",
            Winner::Tie => "tie",
        }
    }
}

#[pymethods]
impl Winner {
    fn __str__(&self) -> &'static str {
        self.as_str()
    }
}

impl From<Winner> for RustWinner {
    fn from(w: Winner) -> Self {
        match w {
            Winner::SourceA => RustWinner::SourceA,
            Winner::SourceB => RustWinner::SourceB,
            Winner::Tie => RustWinner::Tie,
        }
    }
}

impl From<RustWinner> for Winner {
    fn from(w: RustWinner) -> Self {
        match w {
            RustWinner::SourceA => Winner::SourceA,
            RustWinner::SourceB => Winner::SourceB,
            RustWinner::Tie => Winner::Tie,
        }
    }
}

/// One scraped product entry.
#[pyclass]
#[derive(Clone)]
pub struct Listing {
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub price: Option<String>,
    #[pyo3(get, set)]
    pub source: Source,
    #[pyo3(get, set)]
    pub seller: Option<String>,
    #[pyo3(get, set)]
    pub image_url: Option<String>,
    #[pyo3(get, set)]
    pub product_url: Option<String>,
}

#[pymethods]
impl Listing {
    #[new]
    #[pyo3(signature = (name, price=None, source=Source::SourceA, seller=None, image_url=None, product_url=None))]
    fn new(
        name: String,
        price: Option<String>,
        source: Source,
        seller: Option<String>,
        image_url: Option<String>,
        product_url: Option<String>,
    ) -> Self {
        Listing {
            name,
            price,
            source,
            seller,
            image_url,
            product_url,
        }
    }

    /// Normalized price; `inf` when unavailable.
    #[getter]
    fn price_value(&self) -> f64 {
        normalize_price(self.price.as_deref())
    }

    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new_bound(py);
        dict.set_item("name", &self.name)?;
        dict.set_item("price", &self.price)?;
        dict.set_item("source", RustSource::from(self.source).as_str())?;
        dict.set_item("seller", &self.seller)?;
        dict.set_item("image_url", &self.image_url)?;
        dict.set_item("product_url", &self.product_url)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "Listing(name={:?}, price={:?}, source={})",
            self.name,
            self.price,
            RustSource::from(self.source).as_str()
        )
    }
}

impl From<Listing> for RustListing {
    fn from(l: Listing) -> Self {
        RustListing {
            name: l.name,
            price: l.price,
            source: l.source.into(),
            seller: l.seller,
            image_url: l.image_url,
            product_url: l.product_url,
        }
    }
}

impl From<RustListing> for Listing {
    fn from(l: RustListing) -> Self {
        Listing {
            name: l.name,
            price: l.price,
            source: l.source.into(),
            seller: l.seller,
            image_url: l.image_url,
            product_url: l.product_url,
        }
    }
}

// The source is assigned by the collection the listing is passed in.
impl From<Listing> for RawListing {
    fn from(l: Listing) -> Self {
        RawListing {
            name: Some(l.name),
            price: l.price,
            seller: l.seller,
            image_url: l.image_url,
            product_url: l.product_url,
        }
    }
}

/// A source-A listing matched to a source-B listing.
#[pyclass]
#[derive(Clone)]
pub struct Comparison {
    #[pyo3(get)]
    pub a_listing: Listing,
    #[pyo3(get)]
    pub b_listing: Listing,
    #[pyo3(get)]
    pub price_difference: String,
    #[pyo3(get)]
    pub winner: Winner,
    #[pyo3(get)]
    pub best_deal: String,
}

#[pymethods]
impl Comparison {
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new_bound(py);
        dict.set_item("a_listing", self.a_listing.to_dict(py)?)?;
        dict.set_item("b_listing", self.b_listing.to_dict(py)?)?;
        dict.set_item("price_difference", &self.price_difference)?;
        dict.set_item("winner", self.winner.as_str())?;
        dict.set_item("best_deal", &self.best_deal)?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "Comparison(a={:?}, b={:?}, price_difference={:?}, best_deal={:?})",
            self.a_listing.name, self.b_listing.name, self.price_difference, self.best_deal
        )
    }
}

impl From<RustComparison> for Comparison {
    fn from(c: RustComparison) -> Self {
        Comparison {
            a_listing: c.a_listing.into(),
            b_listing: c.b_listing.into(),
            price_difference: c.price_difference,
            winner: c.winner.into(),
            best_deal: c.best_deal,
        }
    }
}

impl From<Comparison> for RustComparison {
    fn from(c: Comparison) -> Self {
        RustComparison {
            a_listing: c.a_listing.into(),
            b_listing: c.b_listing.into(),
            price_difference: c.price_difference,
            winner: c.winner.into(),
            best_deal: c.best_deal,
        }
    }
}

/// Deduplicated, price-sorted listings of both sources plus comparisons.
#[pyclass]
#[derive(Clone)]
pub struct SearchResults {
    #[pyo3(get)]
    pub source_a: Vec<Listing>,
    #[pyo3(get)]
    pub source_b: Vec<Listing>,
    #[pyo3(get)]
    pub comparisons: Vec<Comparison>,
}

#[pymethods]
impl SearchResults {
    /// The `{source_a, source_b, comparisons}` object as JSON text.
    fn to_json(&self) -> PyResult<String> {
        let results = RustSearchResults::from(self.clone());
        serde_json::to_string(&results).map_err(|e| to_py_err(e.into()))
    }

    fn __repr__(&self) -> String {
        format!(
            "SearchResults(source_a={}, source_b={}, comparisons={})",
            self.source_a.len(),
            self.source_b.len(),
            self.comparisons.len()
        )
    }
}

impl From<RustSearchResults> for SearchResults {
    fn from(r: RustSearchResults) -> Self {
        SearchResults {
            source_a: r.source_a.into_iter().map(Into::into).collect(),
            source_b: r.source_b.into_iter().map(Into::into).collect(),
            comparisons: r.comparisons.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<SearchResults> for RustSearchResults {
    fn from(r: SearchResults) -> Self {
        RustSearchResults {
            source_a: r.source_a.into_iter().map(Into::into).collect(),
            source_b: r.source_b.into_iter().map(Into::into).collect(),
            comparisons: r.comparisons.into_iter().map(Into::into).collect(),
        }
    }
}

/// A listing passed in from Python: a `Listing` object or a dict.
struct ListingArg(RawListing);

impl<'py> FromPyObject<'py> for ListingArg {
    fn extract_bound(ob: &Bound<'py, PyAny>) -> PyResult<Self> {
        if let Ok(listing) = ob.extract::<Listing>() {
            return Ok(ListingArg(listing.into()));
        }

        let dict = ob.downcast::<PyDict>()?;
        Ok(ListingArg(RawListing {
            name: dict_field(dict, "name")?,
            price: dict_field(dict, "price")?,
            seller: dict_field(dict, "seller")?,
            image_url: dict_field(dict, "image_url")?,
            product_url: dict_field(dict, "product_url")?,
        }))
    }
}

// Missing keys and `None` values both read as absent.
fn dict_field(dict: &Bound<'_, PyDict>, key: &str) -> PyResult<Option<String>> {
    match dict.get_item(key)? {
        Some(value) => value.extract::<Option<String>>(),
        None => Ok(None),
    }
}

fn into_raw(listings: Vec<ListingArg>) -> Vec<RawListing> {
    listings.into_iter().map(|l| l.0).collect()
}

// ============================================================================
// Functions
// ============================================================================

/// Convert a price string to a float. Non-strings and unparseable text give `inf`.
#[pyfunction]
#[pyo3(signature = (price=None))]
fn clean_price(price: Option<&Bound<'_, PyAny>>) -> f64 {
    let text = price.and_then(|p| p.extract::<String>().ok());
    normalize_price(text.as_deref())
}

/// Lower-cased keyword set of a product name.
#[pyfunction]
fn get_keywords(name: &str) -> HashSet<String> {
    keywords(name)
}

/// Jaccard similarity of two product names.
#[pyfunction]
fn jaccard(a: &str, b: &str) -> f64 {
    name_similarity(a, b)
}

/// Match two listing lists with the default configuration.
#[pyfunction]
fn compare_products(a: Vec<ListingArg>, b: Vec<ListingArg>) -> PyResult<Vec<Comparison>> {
    Matcher::from_config(RustConfig::default()).compare(a, b)
}

/// Build the full `{source_a, source_b, comparisons}` result.
#[pyfunction]
fn build_results(a: Vec<ListingArg>, b: Vec<ListingArg>) -> PyResult<SearchResults> {
    Matcher::from_config(RustConfig::default()).build_results(a, b)
}

/// Install a tracing subscriber. `filter` uses `RUST_LOG` syntax and
/// defaults to the environment, then `info`.
#[pyfunction]
#[pyo3(signature = (filter=None))]
fn init_logging(filter: Option<&str>) -> PyResult<()> {
    let filter = match filter {
        Some(directives) => {
            EnvFilter::try_new(directives).map_err(|e| PyValueError::new_err(e.to_string()))?
        }
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| PyRuntimeError::new_err(e.to_string()))
}

// ============================================================================
// Matcher
// ============================================================================

/// Configurable matcher.
#[pyclass]
pub struct Matcher {
    config: RustConfig,
    inner: RustMatcher,
}

impl Matcher {
    fn from_config(config: RustConfig) -> Self {
        let inner = RustMatcher::new(&config);
        Matcher { config, inner }
    }
}

#[pymethods]
impl Matcher {
    /// Create a matcher. `config_json` may override any configuration section.
    #[new]
    #[pyo3(signature = (config_json=None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(json) => RustConfig::from_json_str(json).map_err(to_py_err)?,
            None => RustConfig::default(),
        };
        Ok(Self::from_config(config))
    }

    /// Similarity a pair must exceed to match.
    #[getter]
    fn threshold(&self) -> f64 {
        self.inner.threshold()
    }

    /// Match a source-A list against a source-B list.
    fn compare(&self, a: Vec<ListingArg>, b: Vec<ListingArg>) -> PyResult<Vec<Comparison>> {
        let comparisons = self
            .inner
            .compare_raw(into_raw(a), into_raw(b))
            .map_err(to_py_err)?;
        Ok(comparisons.into_iter().map(Into::into).collect())
    }

    /// Build the full search result: deduplicated, price-sorted listings
    /// plus comparisons.
    fn build_results(&self, a: Vec<ListingArg>, b: Vec<ListingArg>) -> PyResult<SearchResults> {
        let results = dealmatch_search::build_results(into_raw(a), into_raw(b), &self.config)
            .map_err(to_py_err)?;
        Ok(results.into())
    }

    fn __repr__(&self) -> String {
        format!(
            "Matcher(threshold={}, glyph={:?})",
            self.inner.threshold(),
            self.config.currency.glyph
        )
    }
}

// ============================================================================
// Module Definition
// ============================================================================

/// dealmatch - cross-site listing matching for Python.
#[pymodule]
fn dealmatch(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Types
    m.add_class::<Source>()?;
    m.add_class::<Winner>()?;
    m.add_class::<Listing>()?;
    m.add_class::<Comparison>()?;
    m.add_class::<SearchResults>()?;

    // Functions
    m.add_function(wrap_pyfunction!(clean_price, m)?)?;
    m.add_function(wrap_pyfunction!(get_keywords, m)?)?;
    m.add_function(wrap_pyfunction!(jaccard, m)?)?;
    m.add_function(wrap_pyfunction!(compare_products, m)?)?;
    m.add_function(wrap_pyfunction!(build_results, m)?)?;
    m.add_function(wrap_pyfunction!(init_logging, m)?)?;

    // Classes
    m.add_class::<Matcher>()?;

    Ok(())
}
