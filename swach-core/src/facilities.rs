//! Facility directory helpers: the in-memory filter pipeline the directory
//! view re-runs on every keystroke, and the external map link-out.

use crate::schema::{FacilityType, WasteFacility};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

// RFC 3986 unreserved characters stay bare in the search query.
const QUERY_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Case-insensitive substring match over name, city and address, combined
/// with an optional type-equality filter. Both filters are pure and applied
/// against the full fetched set; no re-fetch happens per filter change.
pub fn filter<'a>(
    facilities: &'a [WasteFacility],
    query: &str,
    kind: Option<FacilityType>,
) -> Vec<&'a WasteFacility> {
    let needle = query.trim().to_lowercase();

    facilities
        .iter()
        .filter(|facility| {
            needle.is_empty()
                || facility.name.to_lowercase().contains(&needle)
                || facility.city.to_lowercase().contains(&needle)
                || facility.address.to_lowercase().contains(&needle)
        })
        .filter(|facility| kind.map_or(true, |kind| facility.kind == kind))
        .collect()
}

/// Directions link: coordinates when the facility has them, otherwise a
/// search on "address, city".
pub fn directions_url(facility: &WasteFacility) -> String {
    match (facility.latitude, facility.longitude) {
        (Some(lat), Some(lng)) => {
            format!("https://www.google.com/maps/dir/?api=1&destination={lat},{lng}")
        }
        _ => format!(
            "https://www.google.com/maps/search/?api=1&query={}",
            utf8_percent_encode(
                &format!("{}, {}", facility.address, facility.city),
                QUERY_SET
            )
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(name: &str, city: &str, address: &str, kind: FacilityType) -> WasteFacility {
        WasteFacility {
            id: name.to_lowercase(),
            name: name.into(),
            kind,
            address: address.into(),
            city: city.into(),
            latitude: None,
            longitude: None,
            capacity_tons: None,
            contact_person: None,
            phone: None,
            is_active: true,
        }
    }

    fn sample() -> Vec<WasteFacility> {
        vec![
            facility("Green Cycle Hub", "Indore", "12 Ring Road", FacilityType::Recycling),
            facility("City Biogas", "Indore", "Sector 9", FacilityType::Biomethanization),
            facility("Greenfield Energy", "Bhopal", "NH-46", FacilityType::WasteToEnergy),
            facility("Scrap Point", "Bhopal", "Old Market", FacilityType::ScrapCollection),
        ]
    }

    #[test]
    fn text_filter_is_case_insensitive_over_all_three_fields() {
        let facilities = sample();
        let by_name = filter(&facilities, "GREEN", None);
        assert_eq!(by_name.len(), 2);

        let by_city = filter(&facilities, "bhopal", None);
        assert_eq!(by_city.len(), 2);

        let by_address = filter(&facilities, "ring road", None);
        assert_eq!(by_address.len(), 1);
        assert_eq!(by_address[0].name, "Green Cycle Hub");
    }

    #[test]
    fn filters_commute_and_are_idempotent() {
        let facilities = sample();

        let text_then_type: Vec<String> = filter(&facilities, "green", Some(FacilityType::Recycling))
            .iter()
            .map(|f| f.id.clone())
            .collect();

        // apply type over the text-filtered subset instead
        let text_first: Vec<WasteFacility> = filter(&facilities, "green", None)
            .into_iter()
            .cloned()
            .collect();
        let type_second: Vec<String> = filter(&text_first, "", Some(FacilityType::Recycling))
            .iter()
            .map(|f| f.id.clone())
            .collect();

        assert_eq!(text_then_type, type_second);
        assert_eq!(text_then_type, vec!["green cycle hub".to_string()]);

        // idempotent: re-applying the same filters changes nothing
        let once: Vec<WasteFacility> = filter(&facilities, "green", None)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter(&once, "green", None);
        assert_eq!(twice.len(), once.len());
    }

    #[test]
    fn empty_query_and_no_type_returns_everything() {
        let facilities = sample();
        assert_eq!(filter(&facilities, "  ", None).len(), facilities.len());
    }

    #[test]
    fn directions_prefer_coordinates() {
        let mut with_coords = facility("Green Cycle Hub", "Indore", "12 Ring Road", FacilityType::Recycling);
        with_coords.latitude = Some(22.7196);
        with_coords.longitude = Some(75.8577);
        assert_eq!(
            directions_url(&with_coords),
            "https://www.google.com/maps/dir/?api=1&destination=22.7196,75.8577"
        );

        let without = facility("Scrap Point", "Bhopal", "Old Market", FacilityType::ScrapCollection);
        assert_eq!(
            directions_url(&without),
            "https://www.google.com/maps/search/?api=1&query=Old%20Market%2C%20Bhopal"
        );
    }

    #[test]
    fn search_query_keeps_unreserved_characters_bare() {
        let depot = facility("Depot", "Indore", "Plot-7_B.2~old", FacilityType::Recycling);
        assert_eq!(
            directions_url(&depot),
            "https://www.google.com/maps/search/?api=1&query=Plot-7_B.2~old%2C%20Indore"
        );
    }
}
