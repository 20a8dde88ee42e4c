//! The [OpenCage Geocoding API](https://opencagedata.com/api) provider.
//!
//! Geocoding methods are implemented on the [`Opencage`](struct.Opencage.html) struct.
//! Please see the [API documentation](https://opencagedata.com/api) for details.
//! An API key is required; free-trial keys are rate limited, and the remaining
//! quota is reported in [`OpencageResponse::rate`](../../opencage/struct.OpencageResponse.html#structfield.rate).
//!
//! ### Example
//!
//! ```no_run
//! use ocgeo::opencage::Parameters;
//! use ocgeo::Opencage;
//!
//! let oc = Opencage::new("dcdbf0d783374909b3debee728c7cc10".to_string());
//! let params = Parameters::new().with_language("en").with_annotations(true).build();
//! let res = oc.forward_full("Syena, Aswan Governorate, Egypt", Some(&params)).unwrap();
//! if res.is_ok() {
//!     for result in &res.results {
//!         println!("{} (confidence {})", result.formatted, result.confidence);
//!     }
//! } else {
//!     println!("request failed: {} {}", res.status.code, res.status.message);
//! }
//! ```
use crate::blocking::{Forward, Reverse, Transport};
use crate::opencage::{build_url, reverse_query, OpencageResponse, Parameters, ENDPOINT};
use crate::{GeocodingError, Point, UA_STRING};
use num_traits::Float;
use reqwest::blocking::Client;
use std::fmt::Debug;
use tracing::{debug, warn};

type DebugHook = Box<dyn Fn(&str) + Send + Sync>;

/// An instance of the OpenCage geocoding service
pub struct Opencage<H = Client> {
    api_key: String,
    endpoint: String,
    user_agent: String,
    transport: H,
    debug_hook: Option<DebugHook>,
}

impl Opencage {
    /// Create a new OpenCage geocoding instance using the default endpoint
    pub fn new(api_key: String) -> Self {
        Opencage::with_transport(api_key, Client::new())
    }
}

impl<H> Opencage<H>
where
    H: Transport,
{
    /// Create a new OpenCage geocoding instance sending its requests through `transport`
    pub fn with_transport(api_key: String, transport: H) -> Self {
        Opencage {
            api_key,
            endpoint: ENDPOINT.to_string(),
            user_agent: UA_STRING.to_string(),
            transport,
            debug_hook: None,
        }
    }

    /// Set a custom endpoint, e.g. "https://api.opencagedata.com/geocode/v1/json"
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_owned();
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_owned();
        self
    }

    /// Receive the pretty-printed JSON of every response before it is decoded
    pub fn with_debug_hook<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.debug_hook = Some(Box::new(hook));
        self
    }

    /// A forward-geocoding lookup of a place, returning the full response.
    ///
    /// `None` for `params` means [`Parameters::default()`](../../opencage/struct.Parameters.html).
    /// A service-side error (invalid key, quota exceeded, ...) is returned
    /// as an `Ok` response whose `status` says so.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ocgeo::coords::{LatLng, LatLngBounds};
    /// use ocgeo::opencage::Parameters;
    /// use ocgeo::Opencage;
    ///
    /// let oc = Opencage::new("dcdbf0d783374909b3debee728c7cc10".to_string());
    /// let bounds = LatLngBounds::new(
    ///     LatLng::new(51.52319711775629, -0.13427138328552246),
    ///     LatLng::new(51.51989264641164, -0.13806939125061035),
    /// );
    /// let params = Parameters::new().with_bounds(bounds).build();
    /// let res = oc.forward_full("UCL CASA", Some(&params)).unwrap();
    /// assert!(res.results[0].formatted.contains("UCL"));
    /// ```
    pub fn forward_full(
        &self,
        place: &str,
        params: Option<&Parameters>,
    ) -> Result<OpencageResponse, GeocodingError> {
        self.request(true, place, params)
    }

    /// A reverse lookup of a point given in decimal degrees, returning the full response.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ocgeo::Opencage;
    ///
    /// let oc = Opencage::new("dcdbf0d783374909b3debee728c7cc10".to_string());
    /// let res = oc.reverse_full(41.40139, 2.12870, None).unwrap();
    /// assert_eq!(res.results[0].components.road, "Carrer de Calatrava");
    /// ```
    pub fn reverse_full(
        &self,
        lat: f64,
        lng: f64,
        params: Option<&Parameters>,
    ) -> Result<OpencageResponse, GeocodingError> {
        self.request(false, &reverse_query(lat, lng), params)
    }

    fn request(
        &self,
        is_forward: bool,
        query: &str,
        params: Option<&Parameters>,
    ) -> Result<OpencageResponse, GeocodingError> {
        let defaults = Parameters::default();
        let params = params.unwrap_or(&defaults);
        let url = build_url(&self.endpoint, is_forward, query, &self.api_key, params);
        debug!(url = %self.redact(&url), forward = is_forward, "sending OpenCage request");

        let body = self.transport.fetch(&url, &self.user_agent)?;
        let tree: serde_json::Value = serde_json::from_slice(&body)?;
        if let Some(hook) = &self.debug_hook {
            hook(&serde_json::to_string_pretty(&tree)?);
        }

        let mut res = OpencageResponse::from_json(tree)?;
        res.url = url;
        if !res.is_ok() {
            warn!(
                code = res.status.code,
                message = %res.status.message,
                "OpenCage returned an error status"
            );
        }
        Ok(res)
    }

    fn redact(&self, url: &str) -> String {
        let key = format!("key={}", urlencoding::encode(&self.api_key));
        url.replace(&key, "key=<redacted>")
    }
}

impl<H, T> Forward<T> for Opencage<H>
where
    H: Transport,
    T: Float + Debug,
{
    /// A forward-geocoding lookup of an address. Please see [the documentation](https://opencagedata.com/api#ambiguous-results) for details
    /// of best practices in order to obtain good-quality results.
    ///
    /// Results without a geometry are skipped.
    fn forward(&self, place: &str) -> Result<Vec<Point<T>>, GeocodingError> {
        let res = self.forward_full(place, None)?;
        if !res.is_ok() {
            return Err(GeocodingError::Forward);
        }
        res.results
            .iter()
            .filter_map(|r| r.geometry)
            .map(|g| match (T::from(g.lng), T::from(g.lat)) {
                (Some(x), Some(y)) => Ok(Point::new(x, y)),
                _ => Err(GeocodingError::Forward),
            })
            .collect()
    }
}

impl<H, T> Reverse<T> for Opencage<H>
where
    H: Transport,
    T: Float + Debug,
{
    /// A reverse lookup of a point. More detail on the format of the
    /// returned `String` can be found [here](https://blog.opencagedata.com/post/99059889253/good-looking-addresses-solving-the-berlin-berlin)
    fn reverse(&self, point: &Point<T>) -> Result<Option<String>, GeocodingError> {
        let (lat, lng) = match (point.y().to_f64(), point.x().to_f64()) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(GeocodingError::Reverse),
        };
        let res = self.reverse_full(lat, lng, None)?;
        if !res.is_ok() {
            return Err(GeocodingError::Reverse);
        }
        Ok(res.results.first().map(|r| r.formatted.clone()))
    }
}
