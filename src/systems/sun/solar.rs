// Low precision solar ephemeris, good to a fraction of a degree
// https://aa.quae.nl/en/reken/zonpositie.html
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::f64::consts::PI;

use crate::config::{SiteConfig, SUN_REFERENCE_DAY, SUN_REFERENCE_YEAR};
use crate::error::ViewerError;

const RAD: f64 = PI / 180.0;
const DAY_MS: f64 = 86_400_000.0;
const J1970: f64 = 2_440_588.0;
const J2000: f64 = 2_451_545.0;
const OBLIQUITY: f64 = RAD * 23.4397; // of the ecliptic
const PERIHELION: f64 = RAD * 102.9372;

/// Sun direction as seen from the site, in radians.
/// Azimuth is measured from south, positive towards west.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarAngles {
    pub azimuth: f64,
    pub altitude: f64,
}

impl SolarAngles {
    pub fn is_above_horizon(&self) -> bool {
        self.altitude >= 0.0
    }
}

fn days_since_j2000(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / DAY_MS - 0.5 + J1970 - J2000
}

fn solar_mean_anomaly(d: f64) -> f64 {
    RAD * (357.5291 + 0.985_600_28 * d)
}

fn ecliptic_longitude(m: f64) -> f64 {
    // equation of centre
    let c = RAD * (1.9148 * m.sin() + 0.02 * (2.0 * m).sin() + 0.0003 * (3.0 * m).sin());
    m + c + PERIHELION + PI
}

fn declination(l: f64) -> f64 {
    (l.sin() * OBLIQUITY.sin()).asin()
}

fn right_ascension(l: f64) -> f64 {
    (l.sin() * OBLIQUITY.cos()).atan2(l.cos())
}

fn sidereal_time(d: f64, lw: f64) -> f64 {
    RAD * (280.16 + 360.985_623_5 * d) - lw
}

/// Where the sun stands at a given instant for an observer at `latitude`/`longitude` (degrees).
pub fn solar_position(at: DateTime<Utc>, latitude: f64, longitude: f64) -> SolarAngles {
    let lw = RAD * -longitude;
    let phi = RAD * latitude;
    let d = days_since_j2000(at);

    let l = ecliptic_longitude(solar_mean_anomaly(d));
    let dec = declination(l);
    let hour_angle = sidereal_time(d, lw) - right_ascension(l);

    SolarAngles {
        azimuth: hour_angle
            .sin()
            .atan2(hour_angle.cos() * phi.sin() - dec.tan() * phi.cos()),
        altitude: (phi.sin() * dec.sin() + phi.cos() * dec.cos() * hour_angle.cos()).asin(),
    }
}

/// Builds the instant for a site-local clock time on the 15th of a month.
/// `time_of_day` wraps into [0, 24), `season_month` is zero based and clamps to December.
pub fn site_datetime(
    time_of_day: f32,
    season_month: u32,
    site: &SiteConfig,
) -> Result<DateTime<Utc>, ViewerError> {
    let time = (time_of_day as f64).rem_euclid(24.0);
    let hour = time.floor() as u32;
    let minute = ((time - time.floor()) * 60.0).floor() as u32;
    let month = season_month.min(11) + 1;

    let local = NaiveDate::from_ymd_opt(SUN_REFERENCE_YEAR, month, SUN_REFERENCE_DAY)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .ok_or(ViewerError::InvalidSiteDate { month, hour, minute })?;

    // an offset out of chrono's range has no instant either
    Duration::try_milliseconds((site.utc_offset_hours * 3_600_000.0).round() as i64)
        .and_then(|offset| local.checked_sub_signed(offset))
        .map(|utc| utc.and_utc())
        .ok_or(ViewerError::InvalidSiteDate { month, hour, minute })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Timelike};

    fn site(latitude: f64) -> SiteConfig {
        SiteConfig {
            latitude,
            longitude: 0.0,
            north_offset_degrees: 0.0,
            utc_offset_hours: 0.0,
        }
    }

    fn altitude_deg(time: f32, month: u32, site: &SiteConfig) -> f64 {
        let at = site_datetime(time, month, site).unwrap();
        solar_position(at, site.latitude, site.longitude).altitude / RAD
    }

    #[test]
    fn clock_time_becomes_utc_instant() {
        let berlin = SiteConfig::default();
        let at = site_datetime(14.5, 5, &berlin).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 6, 15, 13, 30, 0).unwrap());
    }

    #[test]
    fn time_wraps_and_month_clamps() {
        let at = site_datetime(24.0, 40, &site(0.0)).unwrap();
        assert_eq!(at.month(), 12);
        assert_eq!(at.hour(), 0);
        assert_eq!(at.minute(), 0);

        let late = site_datetime(23.999, 0, &site(0.0)).unwrap();
        assert_eq!((late.hour(), late.minute()), (23, 59));
    }

    #[test]
    fn absurd_utc_offset_is_an_error() {
        let mut far = site(0.0);
        far.utc_offset_hours = 1e12;
        assert!(matches!(
            site_datetime(12.0, 5, &far),
            Err(ViewerError::InvalidSiteDate { month: 6, hour: 12, minute: 0 })
        ));

        far.utc_offset_hours = f64::MAX;
        assert!(site_datetime(12.0, 5, &far).is_err());
    }

    #[test]
    fn noon_near_equinox_peaks_at_colatitude() {
        let site = site(45.0);
        let noon = altitude_deg(12.0, 2, &site);
        // mid March declination is a couple of degrees south
        assert!(noon > 40.0 && noon < 46.0, "noon altitude {noon}");
        assert!(noon > altitude_deg(9.0, 2, &site));
        assert!(noon > altitude_deg(15.0, 2, &site));
    }

    #[test]
    fn morning_and_afternoon_mirror_around_noon() {
        let site = site(45.0);
        for month in [2, 8] {
            let morning = altitude_deg(9.0, month, &site);
            let afternoon = altitude_deg(15.0, month, &site);
            assert!(
                (morning - afternoon).abs() < 5.0,
                "month {month}: {morning} vs {afternoon}"
            );
        }
    }

    #[test]
    fn sun_is_down_at_midnight() {
        let site = site(45.0);
        assert!(altitude_deg(0.0, 5, &site) < 0.0);
        assert!(altitude_deg(12.0, 5, &site) > 0.0);
    }

    #[test]
    fn azimuth_swings_from_east_to_west() {
        let site = site(45.0);
        let at = |time| solar_position(site_datetime(time, 5, &site).unwrap(), 45.0, 0.0);
        // measured from south, east is negative
        assert!(at(9.0).azimuth < 0.0);
        assert!(at(15.0).azimuth > 0.0);
        assert!(at(12.0).azimuth.abs() < 10.0 * RAD);
    }

    #[test]
    fn summer_noon_is_higher_than_winter_noon() {
        let site = site(52.0);
        assert!(altitude_deg(12.0, 5, &site) > altitude_deg(12.0, 11, &site) + 40.0);
    }
}
