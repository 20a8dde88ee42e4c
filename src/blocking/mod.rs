pub mod opencage;

use crate::{GeocodingError, Point};
use num_traits::Float;
use reqwest::header::USER_AGENT;

/// Reverse-geocode a coordinate.
///
/// This trait represents the most simple and minimal implementation
/// available from a given geocoding provider: some address formatted as Option<String>.
///
/// Examples
///
/// ```no_run
/// use ocgeo::{Opencage, Point, Reverse};
///
/// let p = Point::new(2.12870, 41.40139);
/// let oc = Opencage::new("dcdbf0d783374909b3debee728c7cc10".to_string());
/// let res = oc.reverse(&p).unwrap();
/// assert_eq!(
///     res,
///     Some("Carrer de Calatrava, 68, 08017 Barcelona, Spain".to_string())
/// );
/// ```
pub trait Reverse<T>
where
    T: Float,
{
    // NOTE TO IMPLEMENTERS: Point coordinates are lon, lat (x, y)
    // OpenCage expects them in lat, lon order
    fn reverse(&self, point: &Point<T>) -> Result<Option<String>, GeocodingError>;
}

/// Forward-geocode a coordinate.
///
/// This trait represents the most simple and minimal implementation available
/// from a given geocoding provider: It returns a `Vec` of zero or more `Points`.
///
/// Examples
///
/// ```no_run
/// use ocgeo::{Forward, Opencage, Point};
///
/// let oc = Opencage::new("dcdbf0d783374909b3debee728c7cc10".to_string());
/// let res: Vec<Point<f64>> = oc.forward("Schwabing, München").unwrap();
/// assert_eq!(res[0], Point::new(11.5884858, 48.1700887));
/// ```
pub trait Forward<T>
where
    T: Float,
{
    // NOTE TO IMPLEMENTERS: while returned provider point data may not be in
    // lon, lat (x, y) order, Geocoding requires this order in its output Point
    // data. Please pay attention when using returned data to construct Points
    fn forward(&self, address: &str) -> Result<Vec<Point<T>>, GeocodingError>;
}

/// Performs the HTTP GET behind a geocoding request.
///
/// Implemented for `reqwest::blocking::Client`; supply your own to control
/// TLS, proxies, timeouts or retries, none of which this crate handles.
pub trait Transport {
    /// GET `url` and return the raw body.
    ///
    /// Only a failed exchange is an error. A response with a non-2xx HTTP
    /// status still carries an OpenCage status document and must be returned.
    fn fetch(&self, url: &str, user_agent: &str) -> Result<Vec<u8>, GeocodingError>;
}

impl Transport for reqwest::blocking::Client {
    fn fetch(&self, url: &str, user_agent: &str) -> Result<Vec<u8>, GeocodingError> {
        let resp = self.get(url).header(USER_AGENT, user_agent).send()?;
        Ok(resp.bytes()?.to_vec())
    }
}
