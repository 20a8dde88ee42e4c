//! End-to-end tests of the OpenCage client against a canned response.
#![cfg(feature = "blocking")]

use ocgeo::coords::{LatLng, LatLngBounds};
use ocgeo::opencage::{Parameters, CODE_OK};
use ocgeo::{GeocodingError, Opencage, Transport};

const FIXTURE: &str = include_str!("fixtures/barcelona.json");

struct CannedTransport(&'static str);

impl Transport for CannedTransport {
    fn fetch(&self, _url: &str, _user_agent: &str) -> Result<Vec<u8>, GeocodingError> {
        Ok(self.0.as_bytes().to_vec())
    }
}

fn client() -> Opencage<CannedTransport> {
    Opencage::with_transport("test-key".to_string(), CannedTransport(FIXTURE))
}

fn annotated() -> Parameters<'static> {
    Parameters::new().with_annotations(true).with_roadinfo(true).build()
}

#[test]
fn decodes_envelope() {
    let res = client().forward_full("Calatrava 68, Barcelona", Some(&annotated())).unwrap();
    assert!(res.is_ok());
    assert_eq!(res.status.code, CODE_OK);
    assert_eq!(res.status.message, "OK");
    assert_eq!(res.total_results, 2);
    assert_eq!(res.results.len(), 2);
    let rate = res.rate.unwrap();
    assert_eq!((rate.limit, rate.remaining, rate.reset), (2500, 2499, 1523318400));
    assert!(res.url.contains("&no_annotations=0&roadinfo=1"));
}

#[test]
fn decodes_first_result() {
    let res = client().forward_full("Calatrava 68, Barcelona", None).unwrap();
    let first = &res.results[0];
    assert_eq!(first.confidence, 10);
    assert_eq!(first.formatted, "Carrer de Calatrava, 68, 08017 Barcelona, Spain");
    assert_eq!(first.geometry, Some(LatLng::new(41.4014067, 2.1287224)));
    assert_eq!(
        first.bounds,
        Some(LatLngBounds::new(
            LatLng::new(41.4015815, 2.128952),
            LatLng::new(41.401227, 2.1284918),
        ))
    );

    let c = &first.components;
    assert_eq!(c.iso_alpha2, "ES");
    assert_eq!(c.iso_alpha3, "ESP");
    assert_eq!(c.kind, "building");
    assert_eq!(c.city_district, "Sarrià - Sant Gervasi");
    assert_eq!(c.house_number, "68");
    assert_eq!(c.postcode, "08017");
    assert_eq!(c.neighbourhood, "");
    assert_eq!(c.state_district, "");
}

#[test]
fn decodes_annotations() {
    let res = client().forward_full("Calatrava 68, Barcelona", None).unwrap();
    let ann = res.results[0].annotations.as_ref().unwrap();
    assert_eq!(ann.callingcode, 34);
    assert_eq!(ann.geohash.as_deref(), Some("sp3e82yhdvd7p5x1mbdv"));
    assert_eq!(ann.what3words.as_deref(), Some("chins.pictures.passes"));
    assert_eq!(ann.mgrs.as_deref(), Some("31TDF2717083684"));
    assert_eq!(ann.maidenhead.as_deref(), Some("JN11bj56ki"));
    assert_eq!(ann.qibla, Some(110.53));

    let currency = ann.currency.as_ref().unwrap();
    assert_eq!(currency.iso_code, "EUR");
    assert_eq!(currency.name, "Euro");
    assert_eq!(currency.thousands_separator, ".");
    assert_eq!(currency.decimal_mark, ",");
    assert_eq!(currency.iso_numeric, "978");
    assert!(currency.symbol_first);

    let tz = ann.timezone.as_ref().unwrap();
    assert_eq!(tz.short_name, "CEST");
    assert_eq!(tz.offset_string, "200");

    let road = ann.roadinfo.as_ref().unwrap();
    assert_eq!(road.drive_on, "right");
    assert_eq!(road.speed_in, "km/h");
}

#[test]
fn second_result_has_no_currency_or_bounds() {
    let res = client().forward_full("Barcelona", None).unwrap();
    let second = &res.results[1];
    assert_eq!(second.formatted, "Barcelona, Spain");
    assert_eq!(second.bounds, None);
    let ann = second.annotations.as_ref().unwrap();
    assert_eq!(ann.currency, None);
    assert_eq!(ann.roadinfo, None);
    assert_eq!(ann.timezone.as_ref().unwrap().offset_string, "+0200");
}

#[test]
fn generic_lookup() {
    let res = client().forward_full("Barcelona", None).unwrap();
    let (first, second) = (&res.results[0], &res.results[1]);

    let symbol = res.lookup(first, "annotations.currency.alternate_symbols.0");
    assert_eq!(symbol.and_then(|v| v.as_str()), Some("EUR"));
    assert!(res
        .lookup(second, "annotations.currency.alternate_symbols.0")
        .is_none());

    assert!(res.lookup(first, "annotations.NON-EXISTENT").is_none());
    assert_eq!(
        res.lookup(first, "annotations.sun.rise.apparent")
            .and_then(|v| v.as_i64()),
        Some(1523251260)
    );
    assert_eq!(
        res.lookup(first, "annotations.DMS.lat").and_then(|v| v.as_str()),
        Some("41° 24' 5.06412'' N")
    );
    assert_eq!(
        ocgeo::path::get_i64(res.raw(), "timestamp.created_unix"),
        Some(1523277181)
    );
}

#[test]
fn release_twice() {
    let mut res = client().reverse_full(41.40139, 2.1287, None).unwrap();
    res.release();
    res.release();
    assert_eq!(res.total_results, 0);
    assert!(res.results.is_empty());
    assert!(res.raw().is_null());
}
