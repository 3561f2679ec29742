use orrery::mpcorb::ElementRecord;

/// Build a synthetic MPCORB.DAT line with the given fields at the documented
/// column offsets. The tail is padded to the width of real catalog records.
pub fn mpcorb_line(
    designation: &str,
    h: &str,
    g: &str,
    epoch: &str,
    m: f64,
    peri: f64,
    node: f64,
    inc: f64,
    e: f64,
    n: f64,
    a: f64,
) -> String {
    let mut line = String::new();
    line.push_str(&format!("{designation:<7} "));
    line.push_str(&format!("{h:>5} "));
    line.push_str(&format!("{g:>5} "));
    line.push_str(&format!("{epoch:<5} "));
    line.push_str(&format!("{m:9.5}  "));
    line.push_str(&format!("{peri:9.5}  "));
    line.push_str(&format!("{node:9.5}  "));
    line.push_str(&format!("{inc:9.5}  "));
    line.push_str(&format!("{e:9.7} "));
    line.push_str(&format!("{n:11.8} "));
    line.push_str(&format!("{a:11.7}"));
    while line.len() < 160 {
        line.push(' ');
    }
    line
}

/// A main-belt body on a near-circular, low-inclination orbit that sits close
/// to opposition for a northern observer in early February 2023.
pub fn opposition_body(designation: &str) -> ElementRecord {
    ElementRecord {
        number: Some(1),
        designation: designation.to_string(),
        epoch: "22A20".to_string(),
        mean_anomaly: 0.0,
        perihelion_arg: 20.0,
        ascending_node: 10.0,
        inclination: 2.0,
        eccentricity: 0.05,
        mean_motion: 0.25,
        semimajor_axis: 2.5,
        absolute_magnitude: Some(12.0),
        slope_parameter: 0.15,
    }
}
