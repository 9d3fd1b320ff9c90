//! Host timestamp and duration types.
//!
//! `time.Time` and `time.Duration` carry the methods the comparison engine
//! probes for: `Equal`, `Truncate` and `String`.

use chrono::{DateTime, TimeDelta, Utc};

use super::reflect::Reflect;
use super::types::{Kind, Method, Type};
use super::value::Value;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Seconds from 0001-01-01 UTC, the host zero time, to the Unix epoch.
const ZERO_TIME_UNIX_SECS: i128 = -62_135_596_800;

pub(crate) fn timestamp_type() -> Type {
    thread_local! {
        static TYPE: Type = {
            let ty = Type::host("Time", "time", Kind::Timestamp);
            ty.add_method(Method::new("Equal", vec![ty.clone()], vec![Type::bool()], |recv, args| {
                let other = args.first().and_then(Value::as_timestamp);
                vec![(recv.as_timestamp().is_some() && recv.as_timestamp() == other).to_value()]
            }));
            ty.add_method(Method::new(
                "Truncate",
                vec![duration_type()],
                vec![ty.clone()],
                |recv, args| {
                    let precision = args.first().and_then(Value::as_i64).unwrap_or(0);
                    recv.as_timestamp()
                        .map(|t| vec![Value::timestamp(truncate_timestamp(t, precision))])
                        .unwrap_or_default()
                },
            ));
            ty.add_method(Method::new("String", vec![], vec![Type::string()], |recv, _| {
                recv.as_timestamp()
                    .map(|t| vec![format_timestamp(&t).to_value()])
                    .unwrap_or_default()
            }));
            ty
        };
    }
    TYPE.with(Type::clone)
}

pub(crate) fn duration_type() -> Type {
    thread_local! {
        static TYPE: Type = {
            let ty = Type::named("Duration", "time", &Type::int64());
            ty.add_method(Method::new(
                "Truncate",
                vec![ty.clone()],
                vec![ty.clone()],
                |recv, args| {
                    let m = args.first().and_then(Value::as_i64).unwrap_or(0);
                    recv.as_i64()
                        .map(|d| vec![Value::duration(truncate_duration(d, m))])
                        .unwrap_or_default()
                },
            ));
            ty.add_method(Method::new("String", vec![], vec![Type::string()], |recv, _| {
                recv.as_i64()
                    .map(|d| vec![format_duration(d).to_value()])
                    .unwrap_or_default()
            }));
            ty
        };
    }
    TYPE.with(Type::clone)
}

/// Rounds `t` down to a multiple of `precision` nanoseconds since the zero
/// time. A non-positive precision leaves `t` unchanged.
pub fn truncate_timestamp(t: DateTime<Utc>, precision: i64) -> DateTime<Utc> {
    if precision <= 0 {
        return t;
    }
    let since_zero = (i128::from(t.timestamp()) - ZERO_TIME_UNIX_SECS) * NANOS_PER_SEC
        + i128::from(t.timestamp_subsec_nanos());
    let excess = since_zero.rem_euclid(i128::from(precision));
    // excess < precision, so it fits in i64
    t.checked_sub_signed(TimeDelta::nanoseconds(excess as i64))
        .unwrap_or(t)
}

/// Rounds `d` toward zero to a multiple of `m`.
pub fn truncate_duration(d: i64, m: i64) -> i64 {
    if m <= 0 {
        return d;
    }
    d - d % m
}

/// Renders a timestamp as `2006-01-02 15:04:05.999999999 +0000 UTC`.
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    let mut out = t.format("%Y-%m-%d %H:%M:%S").to_string();
    let nanos = t.timestamp_subsec_nanos();
    if nanos > 0 {
        let frac = format!("{:09}", nanos);
        out.push('.');
        out.push_str(frac.trim_end_matches('0'));
    }
    out.push_str(" +0000 UTC");
    out
}

/// Renders a duration given in nanoseconds, e.g. `1h2m3.5s`, `1.5µs`, `0s`.
pub fn format_duration(nanos: i64) -> String {
    if nanos == 0 {
        return "0s".to_string();
    }
    let u = nanos.unsigned_abs();
    let mut out = String::new();
    if nanos < 0 {
        out.push('-');
    }

    if u < 1_000 {
        out.push_str(&format!("{}ns", u));
    } else if u < 1_000_000 {
        out.push_str(&fixed(u, 1_000, 3));
        out.push_str("µs");
    } else if u < 1_000_000_000 {
        out.push_str(&fixed(u, 1_000_000, 6));
        out.push_str("ms");
    } else {
        let secs = u / 1_000_000_000;
        let (hours, minutes) = (secs / 3600, (secs / 60) % 60);
        if hours > 0 {
            out.push_str(&format!("{}h", hours));
        }
        if hours > 0 || minutes > 0 {
            out.push_str(&format!("{}m", minutes));
        }
        out.push_str(&fixed(u % 60_000_000_000, 1_000_000_000, 9));
        out.push('s');
    }
    out
}

fn fixed(value: u64, scale: u64, digits: usize) -> String {
    let (whole, frac) = (value / scale, value % scale);
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:0width$}", frac, width = digits);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0), "0s");
        assert_eq!(format_duration(42), "42ns");
        assert_eq!(format_duration(1_500), "1.5µs");
        assert_eq!(format_duration(2_000_000), "2ms");
        assert_eq!(format_duration(1_500_000_000), "1.5s");
        assert_eq!(format_duration(90_000_000_000), "1m30s");
        assert_eq!(format_duration(3_723_500_000_000), "1h2m3.5s");
        assert_eq!(format_duration(3_600_000_000_000), "1h0m0s");
        assert_eq!(format_duration(-1_000), "-1µs");
    }

    #[test]
    fn test_format_timestamp() {
        let t = Utc.with_ymd_and_hms(2017, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(format_timestamp(&t), "2017-03-04 05:06:07 +0000 UTC");
        let t = t + TimeDelta::nanoseconds(120_000_000);
        assert_eq!(format_timestamp(&t), "2017-03-04 05:06:07.12 +0000 UTC");
        let zero = Value::zero(&Type::timestamp());
        assert_eq!(
            zero.as_timestamp().map(|t| format_timestamp(&t)).as_deref(),
            Some("0001-01-01 00:00:00 +0000 UTC")
        );
    }

    #[test]
    fn test_truncate() {
        let base = Utc.with_ymd_and_hms(2017, 3, 4, 5, 6, 7).unwrap();
        let t = base + TimeDelta::nanoseconds(1_123);
        assert_eq!(truncate_timestamp(t, 1_000), base + TimeDelta::nanoseconds(1_000));
        assert_eq!(truncate_timestamp(t, 0), t);

        let before_epoch = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap()
            + TimeDelta::nanoseconds(999);
        assert_eq!(
            truncate_timestamp(before_epoch, 1_000),
            Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap()
        );

        assert_eq!(truncate_duration(1_999, 1_000), 1_000);
        assert_eq!(truncate_duration(-1_999, 1_000), -1_000);
        assert_eq!(truncate_duration(1_999, 0), 1_999);
    }

    #[test]
    fn test_time_methods() {
        let t = Utc.with_ymd_and_hms(2017, 3, 4, 5, 6, 7).unwrap();
        let a = Value::timestamp(t);
        let b = Value::timestamp(t + TimeDelta::nanoseconds(123));

        let equal = a.call_method("Equal", &[b.clone()]).expect("Equal");
        assert_eq!(equal[0].as_bool(), Some(false));

        let truncated = b
            .call_method("Truncate", &[Value::duration(1_000)])
            .expect("Truncate");
        let equal = a.call_method("Equal", &truncated).expect("Equal");
        assert_eq!(equal[0].as_bool(), Some(true));

        let rendered = Value::duration(1_500).call_method("String", &[]).expect("String");
        assert_eq!(rendered[0].as_str(), Some("1.5µs"));
    }
}
