//! Turns a raw station observation into the normalized metric record.

use crate::calc;
use crate::condition::Condition;
use crate::model::{NormalizedObservation, RawObservation};
use crate::units::{f_to_c, ft_to_m, inch_to_mm, inhg_to_hpa, mph_to_kmh, round1, round2};

/// Convert, round and enrich one observation. Pure; every missing or
/// malformed input degrades to an absent output field.
///
/// When the payload carries a metric sub-reading (embedded dashboard JSON)
/// its values are taken as-is; the imperial sub-reading is converted
/// otherwise, so both fetch paths share one mapping.
pub fn enrich_observation(raw: &RawObservation) -> NormalizedObservation {
    let imperial = raw.imperial.clone().unwrap_or_default();
    let metric = raw.metric.clone().unwrap_or_default();

    let temperature = metric.temp.or_else(|| imperial.temp.map(f_to_c)).and_then(round1);
    let dew_point = metric.dewpt.or_else(|| imperial.dewpt.map(f_to_c)).and_then(round1);
    let heat_index = metric
        .heat_index
        .or_else(|| imperial.heat_index.map(f_to_c))
        .and_then(round1);
    let wind_speed = metric
        .wind_speed
        .or_else(|| imperial.wind_speed.map(mph_to_kmh))
        .and_then(round1);
    let wind_gust = metric
        .wind_gust
        .or_else(|| imperial.wind_gust.map(mph_to_kmh))
        .and_then(round1);
    let pressure = metric
        .pressure
        .or_else(|| imperial.pressure.map(inhg_to_hpa))
        .and_then(round2);
    let precipitation_rate = metric
        .precip_rate
        .or_else(|| imperial.precip_rate.map(inch_to_mm))
        .and_then(round2);
    let precipitation = metric
        .precip_total
        .or_else(|| imperial.precip_total.map(inch_to_mm))
        .and_then(round2);
    let elevation_m = metric.elev.or_else(|| imperial.elev.map(ft_to_m)).and_then(round1);

    let condition = Condition::classify(precipitation_rate, raw.solar_radiation, raw.uv);

    NormalizedObservation {
        station_id: raw.station_id.clone(),
        last_updated: raw.obs_time_local.clone().or_else(|| raw.obs_time_utc.clone()),
        location_name: raw.neighborhood.clone().or_else(|| raw.station_id.clone()),
        country: raw.country.clone(),
        lat: raw.lat,
        lon: raw.lon,
        elevation_m,
        temperature,
        feels_like: heat_index,
        dew_point,
        humidity: raw.humidity,
        pressure,
        wind_speed,
        wind_gust,
        wind_bearing: raw.winddir,
        wind_compass: raw.winddir.map(calc::deg_to_compass),
        wind_compass_hu: raw.winddir.map(calc::deg_to_compass_hu),
        precipitation,
        precipitation_rate,
        solar_radiation: raw.solar_radiation,
        uv_index: raw.uv,
        cloud_base: calc::cloud_base(temperature, dew_point),
        absolute_humidity: calc::absolute_humidity(temperature, raw.humidity),
        wind_chill: calc::wind_chill(temperature, wind_speed),
        heat_index,
        condition,
    }
}
