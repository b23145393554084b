//! First-run demo data: a small curriculum and a facility directory so the
//! dashboard has something to show against an empty store.

use crate::state::AppState;
use swach_core::schema::tables;

pub fn is_seeded(state: &AppState) -> Result<bool, String> {
    let modules = state
        .store
        .fetch(tables::TRAINING_MODULES, &[], None)
        .map_err(|e| e.to_string())?;
    Ok(!modules.is_empty())
}

pub fn seed_demo_data(state: &AppState) -> Result<(), String> {
    let modules = [
        (
            "Source Segregation Basics",
            "Separate dry, wet and hazardous waste at home",
            20,
            true,
        ),
        (
            "Home Composting",
            "Turn kitchen waste into compost",
            30,
            true,
        ),
        (
            "Hazardous Waste Handling",
            "Identify and hand over hazardous household waste",
            25,
            true,
        ),
        (
            "Plastic Reduction",
            "Practical ways to cut single-use plastic",
            15,
            false,
        ),
        (
            "Community Reporting",
            "How and when to report illegal dumping",
            10,
            false,
        ),
    ];

    for (i, (title, description, minutes, mandatory)) in modules.iter().enumerate() {
        state
            .store
            .insert(
                tables::TRAINING_MODULES,
                &serde_json::json!({
                    "id": swach_core::new_row_id(),
                    "title": title,
                    "description": description,
                    "content": format!("{description}."),
                    "duration_minutes": minutes,
                    "is_mandatory": mandatory,
                    "target_role": "citizen",
                    "created_at": format!("2026-01-0{}T00:00:00Z", i + 1),
                }),
            )
            .map_err(|e| e.to_string())?;
    }

    let facilities = [
        (
            "Devguradia Biomethanization Plant",
            "biomethanization",
            "Devguradia Trenching Ground",
            "Indore",
            Some((22.6708, 75.9063)),
            Some(550.0),
        ),
        (
            "Green Cycle Recycling Center",
            "recycling",
            "12 Ring Road",
            "Indore",
            None,
            Some(40.0),
        ),
        (
            "Bhanpur Waste-to-Energy Plant",
            "waste_to_energy",
            "Bhanpur Khanti",
            "Bhopal",
            Some((23.3045, 77.4210)),
            Some(400.0),
        ),
        (
            "Old Market Scrap Hub",
            "scrap_collection",
            "Old Market Lane",
            "Bhopal",
            None,
            None,
        ),
    ];

    for (name, kind, address, city, coords, capacity) in facilities {
        state
            .store
            .insert(
                tables::WASTE_FACILITIES,
                &serde_json::json!({
                    "id": swach_core::new_row_id(),
                    "name": name,
                    "type": kind,
                    "address": address,
                    "city": city,
                    "latitude": coords.map(|(lat, _)| lat),
                    "longitude": coords.map(|(_, lng)| lng),
                    "capacity_tons": capacity,
                    "contact_person": null,
                    "phone": null,
                    "is_active": true,
                }),
            )
            .map_err(|e| e.to_string())?;
    }

    Ok(())
}
