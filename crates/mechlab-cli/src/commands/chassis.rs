//! Chassis command handler for listing the catalog.

use anyhow::Result;
use serde::Serialize;

use mechlab_lib::model::ChassisClass;
use mechlab_lib::{Chassis, Database};

use crate::config::DataPaths;

#[derive(Debug, Serialize)]
struct ChassisRow<'a> {
    id: u32,
    name: &'a str,
    tons: f64,
    class: ChassisClass,
    faction: String,
    series: Option<&'a str>,
    engine_min: u32,
    engine_max: u32,
    jump_jets_max: u32,
    module_slots: u32,
    has_stock: bool,
}

impl<'a> ChassisRow<'a> {
    fn new(database: &Database, chassis: &'a Chassis) -> Self {
        Self {
            id: chassis.id,
            name: &chassis.name,
            tons: chassis.mass_max,
            class: chassis.class(),
            faction: chassis.faction.to_string(),
            series: chassis.series(),
            engine_min: chassis.engine_min,
            engine_max: chassis.engine_max,
            jump_jets_max: chassis.jump_jets_max,
            module_slots: chassis.module_slots,
            has_stock: database.has_stock(chassis.id),
        }
    }
}

/// Handle the chassis subcommand.
///
/// Lists every chassis of the resolved catalog sorted by name.
pub fn handle_list_chassis(paths: &DataPaths, json: bool) -> Result<()> {
    let database = paths.load_database()?;
    let rows: Vec<ChassisRow<'_>> = database
        .chassis_sorted()
        .into_iter()
        .map(|chassis| ChassisRow::new(&database, chassis))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print_chassis_table(&rows);
    }
    Ok(())
}

fn print_chassis_table(rows: &[ChassisRow<'_>]) {
    if rows.is_empty() {
        println!("No chassis available in catalog.");
        return;
    }

    println!("Available chassis ({}):", rows.len());
    println!(
        "{:<30} {:>6} {:>6} {:<8} {:<13} {:>9} {:>4} {:>4} {:<5}",
        "Name", "Id", "Tons", "Class", "Faction", "Engine", "JJ", "Mod", "Stock"
    );
    for row in rows {
        let name = match row.series {
            Some(_) => format!("{} (omni)", row.name),
            None => row.name.to_string(),
        };
        println!(
            "{:<30} {:>6} {:>6.0} {:<8} {:<13} {:>9} {:>4} {:>4} {:<5}",
            name,
            row.id,
            row.tons,
            row.class.to_string(),
            row.faction,
            format!("{}-{}", row.engine_min, row.engine_max),
            row.jump_jets_max,
            row.module_slots,
            if row.has_stock { "yes" } else { "no" }
        );
    }
}
