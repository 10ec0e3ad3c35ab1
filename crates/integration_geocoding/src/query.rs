//! Typed geocoding queries
//!
//! Every query is validated when it is built, so a value of any type in this
//! module can be sent (singly or inside a bulk batch) without further checks.

use domain::{Coordinate, DomainError};
use serde::{Deserialize, Serialize};

/// Data layers a result may come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocodingLayer {
    Venue,
    Address,
    Street,
    Country,
    Macroregion,
    Region,
    Macrocounty,
    County,
    Locality,
    Localadmin,
    Borough,
    Neighbourhood,
    Postalcode,
    Dependency,
    Macrohood,
    Marinearea,
    Disputed,
    Empire,
    Continent,
    Ocean,
    /// Every administrative layer
    Coarse,
    /// Venues and points of interest
    Poi,
}

impl GeocodingLayer {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Venue => "venue",
            Self::Address => "address",
            Self::Street => "street",
            Self::Country => "country",
            Self::Macroregion => "macroregion",
            Self::Region => "region",
            Self::Macrocounty => "macrocounty",
            Self::County => "county",
            Self::Locality => "locality",
            Self::Localadmin => "localadmin",
            Self::Borough => "borough",
            Self::Neighbourhood => "neighbourhood",
            Self::Postalcode => "postalcode",
            Self::Dependency => "dependency",
            Self::Macrohood => "macrohood",
            Self::Marinearea => "marinearea",
            Self::Disputed => "disputed",
            Self::Empire => "empire",
            Self::Continent => "continent",
            Self::Ocean => "ocean",
            Self::Coarse => "coarse",
            Self::Poi => "poi",
        }
    }
}

/// Upstream datasets a result may come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeocodingSource {
    Openstreetmap,
    Openaddresses,
    Whosonfirst,
    Geonames,
    Foursquare,
}

impl GeocodingSource {
    /// Wire name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Openstreetmap => "openstreetmap",
            Self::Openaddresses => "openaddresses",
            Self::Whosonfirst => "whosonfirst",
            Self::Geonames => "geonames",
            Self::Foursquare => "foursquare",
        }
    }
}

/// Rectangle results must fall inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryRect {
    min_lat: f64,
    max_lat: f64,
    min_lon: f64,
    max_lon: f64,
}

impl BoundaryRect {
    /// Rectangle spanned by two corners
    ///
    /// # Errors
    ///
    /// Returns an error if the minimum corner lies north or east of the maximum corner.
    pub fn new(min: Coordinate, max: Coordinate) -> Result<Self, DomainError> {
        if min.lat() > max.lat() || min.lon() > max.lon() {
            return Err(DomainError::ValidationError(format!(
                "boundary rectangle minimum ({min}) must lie south-west of maximum ({max})"
            )));
        }
        Ok(Self {
            min_lat: min.lat(),
            max_lat: max.lat(),
            min_lon: min.lon(),
            max_lon: max.lon(),
        })
    }

    #[must_use]
    pub const fn min_lat(&self) -> f64 {
        self.min_lat
    }

    #[must_use]
    pub const fn max_lat(&self) -> f64 {
        self.max_lat
    }

    #[must_use]
    pub const fn min_lon(&self) -> f64 {
        self.min_lon
    }

    #[must_use]
    pub const fn max_lon(&self) -> f64 {
        self.max_lon
    }
}

/// Circle results must fall inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundaryCircle {
    center: Coordinate,
    radius_km: f64,
}

impl BoundaryCircle {
    /// Circle around `center` with a radius in kilometers
    ///
    /// # Errors
    ///
    /// Returns an error if the radius is not a positive finite number.
    pub fn new(center: Coordinate, radius_km: f64) -> Result<Self, DomainError> {
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(DomainError::ValidationError(format!(
                "boundary circle radius must be positive, got {radius_km}"
            )));
        }
        Ok(Self { center, radius_km })
    }

    #[must_use]
    pub const fn center(&self) -> Coordinate {
        self.center
    }

    #[must_use]
    pub const fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

/// Restrictions on where results may come from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Boundary {
    pub rect: Option<BoundaryRect>,
    pub circle: Option<BoundaryCircle>,
    /// Comma-separated ISO 3166 alpha-2 or alpha-3 codes
    pub country: Option<String>,
    /// Global identifier of an administrative area results must lie in
    pub gid: Option<String>,
}

impl Boundary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rect.is_none() && self.circle.is_none() && self.country.is_none() && self.gid.is_none()
    }
}

/// Options shared by free-text and structured search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Results near this point rank higher
    pub focus: Option<Coordinate>,
    pub boundary: Boundary,
    pub layers: Vec<GeocodingLayer>,
    pub sources: Vec<GeocodingSource>,
    /// Maximum number of results
    pub size: Option<u32>,
    /// Preferred language for result labels (BCP 47 tag)
    pub lang: Option<String>,
}

impl SearchOptions {
    fn validate(&self) -> Result<(), DomainError> {
        if self.size == Some(0) {
            return Err(DomainError::ValidationError(
                "size must be greater than 0".to_string(),
            ));
        }
        if self.lang.as_deref().is_some_and(str::is_empty) {
            return Err(DomainError::ValidationError(
                "lang must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Free-text search (`text` is the whole address or place name)
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    text: String,
    options: SearchOptions,
}

impl SearchQuery {
    /// Query for `text`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if the text is blank.
    pub fn new(text: impl Into<String>) -> Result<Self, DomainError> {
        Self::with_options(text, SearchOptions::default())
    }

    /// Query for `text` with pre-built options
    ///
    /// # Errors
    ///
    /// Returns an error if the text is blank or an option is out of range.
    pub fn with_options(text: impl Into<String>, options: SearchOptions) -> Result<Self, DomainError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(DomainError::missing("text"));
        }
        options.validate()?;
        Ok(Self { text, options })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub const fn options(&self) -> &SearchOptions {
        &self.options
    }

    #[must_use]
    pub fn with_focus(mut self, focus: Coordinate) -> Self {
        self.options.focus = Some(focus);
        self
    }

    #[must_use]
    pub fn with_boundary(mut self, boundary: Boundary) -> Self {
        self.options.boundary = boundary;
        self
    }

    #[must_use]
    pub fn with_layers(mut self, layers: impl IntoIterator<Item = GeocodingLayer>) -> Self {
        self.options.layers = layers.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = GeocodingSource>) -> Self {
        self.options.sources = sources.into_iter().collect();
        self
    }

    /// Limit the number of results (a size of zero is ignored)
    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.options.size = (size > 0).then_some(size);
        self
    }

    /// Preferred language (an empty tag is ignored)
    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        let lang = lang.into();
        self.options.lang = (!lang.is_empty()).then_some(lang);
        self
    }
}

/// Search with the address split into components
#[derive(Debug, Clone, PartialEq)]
pub struct SearchStructuredQuery {
    pub(crate) address: Option<String>,
    pub(crate) neighbourhood: Option<String>,
    pub(crate) borough: Option<String>,
    pub(crate) locality: Option<String>,
    pub(crate) county: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) postal_code: Option<String>,
    pub(crate) country: Option<String>,
    pub(crate) options: SearchOptions,
}

impl SearchStructuredQuery {
    #[must_use]
    pub fn builder() -> SearchStructuredQueryBuilder {
        SearchStructuredQueryBuilder::default()
    }

    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    #[must_use]
    pub fn neighbourhood(&self) -> Option<&str> {
        self.neighbourhood.as_deref()
    }

    #[must_use]
    pub fn borough(&self) -> Option<&str> {
        self.borough.as_deref()
    }

    #[must_use]
    pub fn locality(&self) -> Option<&str> {
        self.locality.as_deref()
    }

    #[must_use]
    pub fn county(&self) -> Option<&str> {
        self.county.as_deref()
    }

    #[must_use]
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    #[must_use]
    pub fn postal_code(&self) -> Option<&str> {
        self.postal_code.as_deref()
    }

    #[must_use]
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    #[must_use]
    pub const fn options(&self) -> &SearchOptions {
        &self.options
    }
}

/// Builder for [`SearchStructuredQuery`]
#[derive(Debug, Clone, Default)]
pub struct SearchStructuredQueryBuilder {
    query: StructuredFields,
}

#[derive(Debug, Clone, Default)]
struct StructuredFields {
    address: Option<String>,
    neighbourhood: Option<String>,
    borough: Option<String>,
    locality: Option<String>,
    county: Option<String>,
    region: Option<String>,
    postal_code: Option<String>,
    country: Option<String>,
    options: SearchOptions,
}

fn non_blank(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    (!value.trim().is_empty()).then_some(value)
}

impl SearchStructuredQueryBuilder {
    /// Street address including the house number
    #[must_use]
    pub fn address(mut self, value: impl Into<String>) -> Self {
        self.query.address = non_blank(value);
        self
    }

    #[must_use]
    pub fn neighbourhood(mut self, value: impl Into<String>) -> Self {
        self.query.neighbourhood = non_blank(value);
        self
    }

    #[must_use]
    pub fn borough(mut self, value: impl Into<String>) -> Self {
        self.query.borough = non_blank(value);
        self
    }

    /// City, town or village
    #[must_use]
    pub fn locality(mut self, value: impl Into<String>) -> Self {
        self.query.locality = non_blank(value);
        self
    }

    #[must_use]
    pub fn county(mut self, value: impl Into<String>) -> Self {
        self.query.county = non_blank(value);
        self
    }

    /// State or province
    #[must_use]
    pub fn region(mut self, value: impl Into<String>) -> Self {
        self.query.region = non_blank(value);
        self
    }

    #[must_use]
    pub fn postal_code(mut self, value: impl Into<String>) -> Self {
        self.query.postal_code = non_blank(value);
        self
    }

    /// Country name or ISO 3166 code
    #[must_use]
    pub fn country(mut self, value: impl Into<String>) -> Self {
        self.query.country = non_blank(value);
        self
    }

    #[must_use]
    pub fn focus(mut self, focus: Coordinate) -> Self {
        self.query.options.focus = Some(focus);
        self
    }

    #[must_use]
    pub fn boundary(mut self, boundary: Boundary) -> Self {
        self.query.options.boundary = boundary;
        self
    }

    #[must_use]
    pub fn layers(mut self, layers: impl IntoIterator<Item = GeocodingLayer>) -> Self {
        self.query.options.layers = layers.into_iter().collect();
        self
    }

    #[must_use]
    pub fn sources(mut self, sources: impl IntoIterator<Item = GeocodingSource>) -> Self {
        self.query.options.sources = sources.into_iter().collect();
        self
    }

    #[must_use]
    pub fn size(mut self, size: u32) -> Self {
        self.query.options.size = Some(size);
        self
    }

    #[must_use]
    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.query.options.lang = Some(lang.into());
        self
    }

    #[must_use]
    pub fn options(mut self, options: SearchOptions) -> Self {
        self.query.options = options;
        self
    }

    /// Validate and build the query
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if none of address, locality,
    /// region or postal code is set, or a validation error for an
    /// out-of-range option.
    pub fn build(self) -> Result<SearchStructuredQuery, DomainError> {
        let q = self.query;
        if q.address.is_none()
            && q.locality.is_none()
            && q.region.is_none()
            && q.postal_code.is_none()
        {
            return Err(DomainError::missing(
                "one of address, locality, region or postal_code",
            ));
        }
        q.options.validate()?;

        Ok(SearchStructuredQuery {
            address: q.address,
            neighbourhood: q.neighbourhood,
            borough: q.borough,
            locality: q.locality,
            county: q.county,
            region: q.region,
            postal_code: q.postal_code,
            country: q.country,
            options: q.options,
        })
    }
}

/// Either kind of forward geocoding query
#[derive(Debug, Clone, PartialEq)]
pub enum GeocodingQuery {
    Search(SearchQuery),
    Structured(SearchStructuredQuery),
}

impl GeocodingQuery {
    #[must_use]
    pub const fn options(&self) -> &SearchOptions {
        match self {
            Self::Search(q) => q.options(),
            Self::Structured(q) => q.options(),
        }
    }
}

impl From<SearchQuery> for GeocodingQuery {
    fn from(query: SearchQuery) -> Self {
        Self::Search(query)
    }
}

impl From<SearchStructuredQuery> for GeocodingQuery {
    fn from(query: SearchStructuredQuery) -> Self {
        Self::Structured(query)
    }
}

/// Reverse geocoding: find places near a point
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseQuery {
    point: Coordinate,
    radius_km: Option<f64>,
    country: Option<String>,
    gid: Option<String>,
    layers: Vec<GeocodingLayer>,
    sources: Vec<GeocodingSource>,
    size: Option<u32>,
    lang: Option<String>,
}

impl ReverseQuery {
    #[must_use]
    pub const fn new(point: Coordinate) -> Self {
        Self {
            point,
            radius_km: None,
            country: None,
            gid: None,
            layers: Vec::new(),
            sources: Vec::new(),
            size: None,
            lang: None,
        }
    }

    #[must_use]
    pub const fn point(&self) -> Coordinate {
        self.point
    }

    /// Search radius around the point (non-positive values are ignored)
    #[must_use]
    pub fn with_radius_km(mut self, radius_km: f64) -> Self {
        self.radius_km = (radius_km.is_finite() && radius_km > 0.0).then_some(radius_km);
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = non_blank(country);
        self
    }

    #[must_use]
    pub fn with_gid(mut self, gid: impl Into<String>) -> Self {
        self.gid = non_blank(gid);
        self
    }

    #[must_use]
    pub fn with_layers(mut self, layers: impl IntoIterator<Item = GeocodingLayer>) -> Self {
        self.layers = layers.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_sources(mut self, sources: impl IntoIterator<Item = GeocodingSource>) -> Self {
        self.sources = sources.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = (size > 0).then_some(size);
        self
    }

    #[must_use]
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = non_blank(lang);
        self
    }

    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("point.lat", self.point.lat().to_string()),
            ("point.lon", self.point.lon().to_string()),
        ];
        push_opt(&mut pairs, "boundary.circle.radius", self.radius_km);
        push_opt(&mut pairs, "boundary.country", self.country.as_ref());
        push_opt(&mut pairs, "boundary.gid", self.gid.as_ref());
        push_list(&mut pairs, "layers", self.layers.iter().map(GeocodingLayer::as_str));
        push_list(&mut pairs, "sources", self.sources.iter().map(GeocodingSource::as_str));
        push_opt(&mut pairs, "size", self.size);
        push_opt(&mut pairs, "lang", self.lang.as_ref());
        pairs
    }
}

/// Non-empty list of global place identifiers (`source:layer:id`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceIds(Vec<String>);

impl PlaceIds {
    /// # Errors
    ///
    /// Returns an error if no ids are given or one of them is blank.
    pub fn new<I, S>(ids: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        DomainError::require_len("ids", &ids, 1)?;
        if ids.iter().any(|id| id.trim().is_empty()) {
            return Err(DomainError::ValidationError(
                "place ids must not be blank".to_string(),
            ));
        }
        Ok(Self(ids))
    }

    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

pub(crate) fn push_opt<V: ToString>(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    value: Option<V>,
) {
    if let Some(value) = value {
        pairs.push((key, value.to_string()));
    }
}

pub(crate) fn push_list<'a>(
    pairs: &mut Vec<(&'static str, String)>,
    key: &'static str,
    values: impl Iterator<Item = &'a str>,
) {
    let joined = values.collect::<Vec<_>>().join(",");
    if !joined.is_empty() {
        pairs.push((key, joined));
    }
}
