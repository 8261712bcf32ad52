use std::collections::HashMap;

use panfm_model::Sample;

/// Flattens a [`Sample`]'s nested substructures into the flat
/// `metric_type -> value` bag `AlertConfig::metric_type` is compared
/// against — e.g. `sessions.active` becomes `sessions`,
/// `cpu.data_plane_pct` becomes `cpu`. `cpu_temp` is the one field still
/// genuinely absent on appliances without a temperature sensor.
pub fn metric_bag(sample: &Sample) -> HashMap<&'static str, f64> {
    let mut bag = HashMap::new();

    bag.insert("throughput_in", sample.inbound_mbps);
    bag.insert("throughput_out", sample.outbound_mbps);
    bag.insert("throughput_total", sample.total_mbps);
    bag.insert("cpu", sample.cpu.data_plane_pct);
    bag.insert("memory", sample.cpu.memory_used_pct);
    bag.insert("sessions", sample.sessions.active as f64);
    bag.insert("disk_root", sample.disk_usage.root_pct);
    insert(&mut bag, "cpu_temp", sample.cpu_temp);

    bag.insert("threats_critical", sample.threats_count as f64);
    bag.insert("interface_errors", sample.interface_errors as f64);

    bag
}

fn insert(bag: &mut HashMap<&'static str, f64>, key: &'static str, value: Option<f64>) {
    if let Some(value) = value {
        bag.insert(key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use panfm_model::DeviceId;

    #[test]
    fn flattens_nested_fields_and_defaults_unset_numerics_to_zero() {
        let mut sample = Sample::new(DeviceId::new(), Utc::now());
        sample.cpu.data_plane_pct = 42.5;
        sample.sessions.active = 1000;
        sample.threats_count = 3;

        let bag = metric_bag(&sample);

        assert_eq!(bag.get("cpu"), Some(&42.5));
        assert_eq!(bag.get("sessions"), Some(&1000.0));
        assert_eq!(bag.get("threats_critical"), Some(&3.0));
        assert_eq!(bag.get("throughput_in"), Some(&0.0));
        assert_eq!(bag.get("cpu_temp"), None);
    }
}
