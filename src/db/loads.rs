// src/db/loads.rs
use crate::db::connection::Database;
use crate::errors::ApiError;
use chrono::{Duration, NaiveDate};
use rusqlite::params;
use serde::Serialize;
use std::collections::HashSet;

/// One demo load as served to callers.
#[derive(Debug, Clone, Serialize)]
pub struct Load {
    pub load_id: String,
    pub origin: String,
    pub destination: String,
    pub pickup_datetime: String,
    pub delivery_datetime: String,
    pub equipment_type: String,
    pub loadboard_rate: f64,
    pub notes: Option<String>,
    pub weight: i64,
    pub commodity_type: String,
    pub num_of_pieces: i64,
    pub miles: i64,
    pub dimensions: String,
}

// (state, origin city, destination, equipment, commodity) — one per state.
const STATE_LOAD_DETAILS: &[(&str, &str, &str, &str, &str)] = &[
    ("AL", "Birmingham", "Charlotte, NC", "Flatbed", "Steel Beams"),
    ("AK", "Anchorage", "Seattle, WA", "Reefer", "Seafood"),
    ("AZ", "Phoenix", "Denver, CO", "Dry Van", "Consumer Goods"),
    ("AR", "Little Rock", "Memphis, TN", "Dry Van", "Paper Products"),
    ("CA", "Los Angeles", "Portland, OR", "Dry Van", "Apparel"),
    ("CO", "Denver", "Salt Lake City, UT", "Reefer", "Fresh Produce"),
    ("CT", "Hartford", "Albany, NY", "Dry Van", "Medical Supplies"),
    ("DE", "Wilmington", "Baltimore, MD", "Dry Van", "Packaged Foods"),
    ("FL", "Miami", "Atlanta, GA", "Reefer", "Frozen Foods"),
    ("GA", "Savannah", "Birmingham, AL", "Flatbed", "Lumber"),
    ("HI", "Honolulu", "Los Angeles, CA", "Reefer", "Processed Foods"),
    ("ID", "Boise", "Spokane, WA", "Dry Van", "Paper Products"),
    ("IL", "Chicago", "Detroit, MI", "Flatbed", "Machinery"),
    ("IN", "Indianapolis", "Columbus, OH", "Dry Van", "Automotive Parts"),
    ("IA", "Des Moines", "Minneapolis, MN", "Dry Van", "Agricultural Supplies"),
    ("KS", "Wichita", "Oklahoma City, OK", "Flatbed", "Construction Materials"),
    ("KY", "Louisville", "St. Louis, MO", "Reefer", "Beverages"),
    ("LA", "New Orleans", "Houston, TX", "Flatbed", "Petrochemical Equipment"),
    ("ME", "Portland", "Boston, MA", "Dry Van", "Seafood"),
    ("MD", "Baltimore", "Newark, NJ", "Dry Van", "Consumer Packaged Goods"),
    ("MA", "Boston", "Manchester, NH", "Dry Van", "Pharmaceuticals"),
    ("MI", "Detroit", "Cleveland, OH", "Flatbed", "Steel Coils"),
    ("MN", "Minneapolis", "Milwaukee, WI", "Reefer", "Processed Foods"),
    ("MS", "Jackson", "Baton Rouge, LA", "Dry Van", "Paper Products"),
    ("MO", "St. Louis", "Kansas City, KS", "Flatbed", "Industrial Equipment"),
    ("MT", "Billings", "Fargo, ND", "Flatbed", "Oilfield Supplies"),
    ("NE", "Omaha", "Sioux Falls, SD", "Dry Van", "Food Ingredients"),
    ("NV", "Las Vegas", "Phoenix, AZ", "Dry Van", "Electronics"),
    ("NH", "Manchester", "Hartford, CT", "Dry Van", "Medical Devices"),
    ("NJ", "Newark", "Buffalo, NY", "Dry Van", "Packaged Foods"),
    ("NM", "Albuquerque", "Tulsa, OK", "Flatbed", "Construction Materials"),
    ("NY", "Albany", "Pittsburgh, PA", "Dry Van", "Paper Goods"),
    ("NC", "Charlotte", "Columbia, SC", "Dry Van", "Textiles"),
    ("ND", "Fargo", "Billings, MT", "Flatbed", "Agricultural Machinery"),
    ("OH", "Columbus", "Nashville, TN", "Power Only", "Empty Trailers"),
    ("OK", "Oklahoma City", "Dallas, TX", "Flatbed", "Oilfield Equipment"),
    ("OR", "Portland", "Boise, ID", "Dry Van", "Wood Products"),
    ("PA", "Philadelphia", "Richmond, VA", "Dry Van", "Retail Goods"),
    ("RI", "Providence", "Hartford, CT", "Dry Van", "Office Supplies"),
    ("SC", "Columbia", "Savannah, GA", "Dry Van", "Automotive Components"),
    ("SD", "Sioux Falls", "Omaha, NE", "Reefer", "Dairy Products"),
    ("TN", "Nashville", "Indianapolis, IN", "Dry Van", "Music Equipment"),
    ("TX", "Dallas", "Little Rock, AR", "Dry Van", "Consumer Goods"),
    ("UT", "Salt Lake City", "Reno, NV", "Flatbed", "Mining Equipment"),
    ("VT", "Burlington", "Albany, NY", "Dry Van", "Maple Products"),
    ("VA", "Richmond", "Raleigh, NC", "Dry Van", "Furniture"),
    ("WA", "Seattle", "Boise, ID", "Dry Van", "Paper Products"),
    ("WV", "Charleston", "Lexington, KY", "Dry Van", "Chemicals"),
    ("WI", "Milwaukee", "Chicago, IL", "Reefer", "Cheese"),
    ("WY", "Cheyenne", "Denver, CO", "Flatbed", "Mining Supplies"),
];

fn dimensions_for(equipment: &str) -> &'static str {
    match equipment {
        "Dry Van" => "53ft dry van",
        "Reefer" => "53ft refrigerated trailer",
        "Flatbed" => "48ft flatbed",
        "Power Only" => "Sleeper tractor",
        _ => "53ft trailer",
    }
}

fn handling_note(equipment: &str) -> &'static str {
    match equipment {
        "Dry Van" => "Standard dock pickup with palletized freight.",
        "Reefer" => "Maintain temperature setpoint throughout transit.",
        "Flatbed" => "Straps and edge protectors provided with load.",
        "Power Only" => "Hook and go, trailer ready at shipper.",
        _ => "No special handling required.",
    }
}

/// One example load per U.S. state, derived deterministically so seeding
/// is repeatable.
pub fn build_seed_loads() -> Vec<Load> {
    let base_pickup = NaiveDate::from_ymd_opt(2024, 5, 1)
        .expect("valid date")
        .and_hms_opt(8, 0, 0)
        .expect("valid time");

    STATE_LOAD_DETAILS
        .iter()
        .enumerate()
        .map(|(i, (state, city, destination, equipment, commodity))| {
            let index = (i + 1) as i64;
            let pickup = base_pickup + Duration::days(index);
            let delivery = pickup + Duration::days(2) + Duration::hours((index % 5) * 3);

            let weight = if *equipment == "Power Only" {
                18000
            } else {
                26000 + 450 * index
            };

            let mut note = format!("{} Departing {city}.", handling_note(equipment));
            if index % 7 == 0 {
                note.push_str(" Team transit recommended for on-time delivery.");
            }

            Load {
                load_id: format!("L-{:04}", 2000 + index),
                origin: format!("{city}, {state}"),
                destination: destination.to_string(),
                pickup_datetime: pickup.format("%Y-%m-%dT%H:%M").to_string(),
                delivery_datetime: delivery.format("%Y-%m-%dT%H:%M").to_string(),
                equipment_type: equipment.to_string(),
                loadboard_rate: (1700 + 65 * index) as f64,
                notes: Some(note),
                weight,
                commodity_type: commodity.to_string(),
                num_of_pieces: 10 + (index % 12),
                miles: 300 + 22 * index,
                dimensions: dimensions_for(equipment).to_string(),
            }
        })
        .collect()
}

/// Refresh the loads table from the seed when its ids are out of sync.
pub fn seed_loads(db: &Database) -> Result<(), ApiError> {
    let seed = build_seed_loads();

    db.with_conn(|conn| {
        let existing: HashSet<String> = {
            let mut stmt = conn
                .prepare("select load_id from loads")
                .map_err(|e| ApiError::Storage(e.to_string()))?;
            let rows = stmt
                .query_map([], |row| row.get::<_, String>(0))
                .map_err(|e| ApiError::Storage(e.to_string()))?;
            let mut set = HashSet::new();
            for row in rows {
                set.insert(row.map_err(|e| ApiError::Storage(e.to_string()))?);
            }
            set
        };

        let wanted: HashSet<String> = seed.iter().map(|l| l.load_id.clone()).collect();
        if existing == wanted {
            return Ok(());
        }

        tracing::info!(
            existing = existing.len(),
            seed = seed.len(),
            "refreshing seed loads"
        );

        let tx = conn
            .transaction()
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        tx.execute("delete from loads", [])
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        for load in &seed {
            tx.execute(
                r#"
                insert into loads (
                    load_id, origin, destination,
                    pickup_datetime, delivery_datetime,
                    equipment_type, loadboard_rate, notes,
                    weight, commodity_type, num_of_pieces, miles, dimensions
                ) values (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
                params![
                    load.load_id,
                    load.origin,
                    load.destination,
                    load.pickup_datetime,
                    load.delivery_datetime,
                    load.equipment_type,
                    load.loadboard_rate,
                    load.notes,
                    load.weight,
                    load.commodity_type,
                    load.num_of_pieces,
                    load.miles,
                    load.dimensions,
                ],
            )
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        }

        tx.commit().map_err(|e| ApiError::Storage(e.to_string()))
    })
}

/// Return every load from the database.
pub fn fetch_all_loads(db: &Database) -> Result<Vec<Load>, ApiError> {
    db.with_conn(|conn| {
        let mut stmt = conn
            .prepare(
                r#"
                select load_id, origin, destination,
                       pickup_datetime, delivery_datetime,
                       equipment_type, loadboard_rate, notes,
                       weight, commodity_type, num_of_pieces, miles, dimensions
                from loads
                order by load_id
                "#,
            )
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Load {
                    load_id: row.get(0)?,
                    origin: row.get(1)?,
                    destination: row.get(2)?,
                    pickup_datetime: row.get(3)?,
                    delivery_datetime: row.get(4)?,
                    equipment_type: row.get(5)?,
                    loadboard_rate: row.get(6)?,
                    notes: row.get(7)?,
                    weight: row.get(8)?,
                    commodity_type: row.get(9)?,
                    num_of_pieces: row.get(10)?,
                    miles: row.get(11)?,
                    dimensions: row.get(12)?,
                })
            })
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        let mut loads = Vec::new();
        for row in rows {
            loads.push(row.map_err(|e| ApiError::Storage(e.to_string()))?);
        }
        Ok(loads)
    })
}
