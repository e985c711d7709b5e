//! Summarize a value raster by zones and print the table.

use terrastat_core::Raster;
use terrastat_zonal::{zonal_statistics_rasters, StatSelection, ZonalParams};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A small synthetic scene: a 6x6 gradient split into three zone bands.
    let values = Raster::from_vec((0..36).map(f64::from).collect(), 6, 6)?;
    let zones = Raster::from_vec((0..36).map(|i| i / 12 + 1).collect(), 6, 6)?;

    let params = ZonalParams {
        stats: StatSelection::parse(["sum", "count", "min", "max", "mean", "std"])?,
        zone_nodata: None,
    };
    let table = zonal_statistics_rasters(&values, &zones, &params)?;

    print!("zone");
    for column in table.columns() {
        print!("\t{column}");
    }
    println!();

    for row in table.rows() {
        print!("{}", row.zone_id);
        for value in row.values() {
            print!("\t{value:.2}");
        }
        println!();
    }

    Ok(())
}
