// Copyright 2021-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The measurements-for-VF-scaling event: periodic resource and traffic
//! counters, reported per measurement interval. By far the widest payload in
//! the event family; every repeated group preserves insertion order and is
//! omitted from the JSON output while empty.

use crate::data::common::{set_once, NameValuePair, SchemaVersion};
use crate::data::header::EventHeader;
use serde::Serialize;

pub const MEASUREMENT_VERSION: SchemaVersion = SchemaVersion::new(2, 0);

/// Usage of a single CPU.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CpuUsage {
    cpu_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_idle: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_usage_interrupt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_usage_nice: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_usage_soft_irq: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_usage_steal: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_usage_system: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_usage_user: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cpu_wait: Option<f64>,
    percent_usage: f64,
}

impl CpuUsage {
    pub fn identifier(&self) -> &str {
        &self.cpu_identifier
    }

    pub fn set_idle(&mut self, v: f64) {
        set_once(&mut self.cpu_idle, "cpuIdle", v);
    }
    pub fn set_interrupt(&mut self, v: f64) {
        set_once(&mut self.cpu_usage_interrupt, "cpuUsageInterrupt", v);
    }
    pub fn set_nice(&mut self, v: f64) {
        set_once(&mut self.cpu_usage_nice, "cpuUsageNice", v);
    }
    pub fn set_soft_irq(&mut self, v: f64) {
        set_once(&mut self.cpu_usage_soft_irq, "cpuUsageSoftIrq", v);
    }
    pub fn set_steal(&mut self, v: f64) {
        set_once(&mut self.cpu_usage_steal, "cpuUsageSteal", v);
    }
    pub fn set_system(&mut self, v: f64) {
        set_once(&mut self.cpu_usage_system, "cpuUsageSystem", v);
    }
    pub fn set_user(&mut self, v: f64) {
        set_once(&mut self.cpu_usage_user, "cpuUsageUser", v);
    }
    pub fn set_wait(&mut self, v: f64) {
        set_once(&mut self.cpu_wait, "cpuWait", v);
    }
}

/// Usage of a single disk, as min/max/avg/last over the interval.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct DiskUsage {
    disk_identifier: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_io_time_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_io_time_last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_io_time_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_io_time_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_merged_read_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_merged_read_last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_merged_read_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_merged_read_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_merged_write_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_merged_write_last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_merged_write_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_merged_write_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_octets_read_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_octets_read_last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_octets_read_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_octets_read_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_octets_write_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_octets_write_last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_octets_write_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_octets_write_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_ops_read_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_ops_read_last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_ops_read_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_ops_read_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_ops_write_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_ops_write_last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_ops_write_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_ops_write_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_pending_operations_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_pending_operations_last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_pending_operations_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_pending_operations_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_time_read_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_time_read_last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_time_read_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_time_read_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_time_write_avg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_time_write_last: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_time_write_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disk_time_write_min: Option<f64>,
}

impl DiskUsage {
    pub fn identifier(&self) -> &str {
        &self.disk_identifier
    }

    pub fn set_io_time_avg(&mut self, v: f64) {
        set_once(&mut self.disk_io_time_avg, "diskIoTimeAvg", v);
    }
    pub fn set_io_time_last(&mut self, v: f64) {
        set_once(&mut self.disk_io_time_last, "diskIoTimeLast", v);
    }
    pub fn set_io_time_max(&mut self, v: f64) {
        set_once(&mut self.disk_io_time_max, "diskIoTimeMax", v);
    }
    pub fn set_io_time_min(&mut self, v: f64) {
        set_once(&mut self.disk_io_time_min, "diskIoTimeMin", v);
    }
    pub fn set_merged_read_avg(&mut self, v: f64) {
        set_once(&mut self.disk_merged_read_avg, "diskMergedReadAvg", v);
    }
    pub fn set_merged_read_last(&mut self, v: f64) {
        set_once(&mut self.disk_merged_read_last, "diskMergedReadLast", v);
    }
    pub fn set_merged_read_max(&mut self, v: f64) {
        set_once(&mut self.disk_merged_read_max, "diskMergedReadMax", v);
    }
    pub fn set_merged_read_min(&mut self, v: f64) {
        set_once(&mut self.disk_merged_read_min, "diskMergedReadMin", v);
    }
    pub fn set_merged_write_avg(&mut self, v: f64) {
        set_once(&mut self.disk_merged_write_avg, "diskMergedWriteAvg", v);
    }
    pub fn set_merged_write_last(&mut self, v: f64) {
        set_once(&mut self.disk_merged_write_last, "diskMergedWriteLast", v);
    }
    pub fn set_merged_write_max(&mut self, v: f64) {
        set_once(&mut self.disk_merged_write_max, "diskMergedWriteMax", v);
    }
    pub fn set_merged_write_min(&mut self, v: f64) {
        set_once(&mut self.disk_merged_write_min, "diskMergedWriteMin", v);
    }
    pub fn set_octets_read_avg(&mut self, v: f64) {
        set_once(&mut self.disk_octets_read_avg, "diskOctetsReadAvg", v);
    }
    pub fn set_octets_read_last(&mut self, v: f64) {
        set_once(&mut self.disk_octets_read_last, "diskOctetsReadLast", v);
    }
    pub fn set_octets_read_max(&mut self, v: f64) {
        set_once(&mut self.disk_octets_read_max, "diskOctetsReadMax", v);
    }
    pub fn set_octets_read_min(&mut self, v: f64) {
        set_once(&mut self.disk_octets_read_min, "diskOctetsReadMin", v);
    }
    pub fn set_octets_write_avg(&mut self, v: f64) {
        set_once(&mut self.disk_octets_write_avg, "diskOctetsWriteAvg", v);
    }
    pub fn set_octets_write_last(&mut self, v: f64) {
        set_once(&mut self.disk_octets_write_last, "diskOctetsWriteLast", v);
    }
    pub fn set_octets_write_max(&mut self, v: f64) {
        set_once(&mut self.disk_octets_write_max, "diskOctetsWriteMax", v);
    }
    pub fn set_octets_write_min(&mut self, v: f64) {
        set_once(&mut self.disk_octets_write_min, "diskOctetsWriteMin", v);
    }
    pub fn set_ops_read_avg(&mut self, v: f64) {
        set_once(&mut self.disk_ops_read_avg, "diskOpsReadAvg", v);
    }
    pub fn set_ops_read_last(&mut self, v: f64) {
        set_once(&mut self.disk_ops_read_last, "diskOpsReadLast", v);
    }
    pub fn set_ops_read_max(&mut self, v: f64) {
        set_once(&mut self.disk_ops_read_max, "diskOpsReadMax", v);
    }
    pub fn set_ops_read_min(&mut self, v: f64) {
        set_once(&mut self.disk_ops_read_min, "diskOpsReadMin", v);
    }
    pub fn set_ops_write_avg(&mut self, v: f64) {
        set_once(&mut self.disk_ops_write_avg, "diskOpsWriteAvg", v);
    }
    pub fn set_ops_write_last(&mut self, v: f64) {
        set_once(&mut self.disk_ops_write_last, "diskOpsWriteLast", v);
    }
    pub fn set_ops_write_max(&mut self, v: f64) {
        set_once(&mut self.disk_ops_write_max, "diskOpsWriteMax", v);
    }
    pub fn set_ops_write_min(&mut self, v: f64) {
        set_once(&mut self.disk_ops_write_min, "diskOpsWriteMin", v);
    }
    pub fn set_pending_operations_avg(&mut self, v: f64) {
        set_once(&mut self.disk_pending_operations_avg, "diskPendingOperationsAvg", v);
    }
    pub fn set_pending_operations_last(&mut self, v: f64) {
        set_once(&mut self.disk_pending_operations_last, "diskPendingOperationsLast", v);
    }
    pub fn set_pending_operations_max(&mut self, v: f64) {
        set_once(&mut self.disk_pending_operations_max, "diskPendingOperationsMax", v);
    }
    pub fn set_pending_operations_min(&mut self, v: f64) {
        set_once(&mut self.disk_pending_operations_min, "diskPendingOperationsMin", v);
    }
    pub fn set_time_read_avg(&mut self, v: f64) {
        set_once(&mut self.disk_time_read_avg, "diskTimeReadAvg", v);
    }
    pub fn set_time_read_last(&mut self, v: f64) {
        set_once(&mut self.disk_time_read_last, "diskTimeReadLast", v);
    }
    pub fn set_time_read_max(&mut self, v: f64) {
        set_once(&mut self.disk_time_read_max, "diskTimeReadMax", v);
    }
    pub fn set_time_read_min(&mut self, v: f64) {
        set_once(&mut self.disk_time_read_min, "diskTimeReadMin", v);
    }
    pub fn set_time_write_avg(&mut self, v: f64) {
        set_once(&mut self.disk_time_write_avg, "diskTimeWriteAvg", v);
    }
    pub fn set_time_write_last(&mut self, v: f64) {
        set_once(&mut self.disk_time_write_last, "diskTimeWriteLast", v);
    }
    pub fn set_time_write_max(&mut self, v: f64) {
        set_once(&mut self.disk_time_write_max, "diskTimeWriteMax", v);
    }
    pub fn set_time_write_min(&mut self, v: f64) {
        set_once(&mut self.disk_time_write_min, "diskTimeWriteMin", v);
    }
}

/// Memory usage of a VM.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    memory_buffered: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_cached: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_configured: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_free: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_slab_recl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_slab_unrecl: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    memory_used: Option<f64>,
    vm_identifier: String,
}

impl MemoryUsage {
    pub fn identifier(&self) -> &str {
        &self.vm_identifier
    }

    pub fn set_cached(&mut self, v: f64) {
        set_once(&mut self.memory_cached, "memoryCached", v);
    }
    pub fn set_configured(&mut self, v: f64) {
        set_once(&mut self.memory_configured, "memoryConfigured", v);
    }
    pub fn set_free(&mut self, v: f64) {
        set_once(&mut self.memory_free, "memoryFree", v);
    }
    pub fn set_slab_reclaimable(&mut self, v: f64) {
        set_once(&mut self.memory_slab_recl, "memorySlabRecl", v);
    }
    pub fn set_slab_unreclaimable(&mut self, v: f64) {
        set_once(&mut self.memory_slab_unrecl, "memorySlabUnrecl", v);
    }
    pub fn set_used(&mut self, v: f64) {
        set_once(&mut self.memory_used, "memoryUsed", v);
    }
}

/// Filesystem usage, block and ephemeral storage.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FilesystemUsage {
    filesystem_name: String,
    block_configured: f64,
    block_iops: f64,
    block_used: f64,
    ephemeral_configured: f64,
    ephemeral_iops: f64,
    ephemeral_used: f64,
}

impl FilesystemUsage {
    pub fn identifier(&self) -> &str {
        &self.filesystem_name
    }
}

/// One bucket of the request-latency distribution.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct LatencyBucket {
    counts_in_the_bucket: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    high_end_of_latency_bucket: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    low_end_of_latency_bucket: Option<f64>,
}

impl LatencyBucket {
    pub fn set_high_end(&mut self, v: f64) {
        set_once(&mut self.high_end_of_latency_bucket, "highEndOfLatencyBucket", v);
    }
    pub fn set_low_end(&mut self, v: f64) {
        set_once(&mut self.low_end_of_latency_bucket, "lowEndOfLatencyBucket", v);
    }
}

/// Performance counters for one vNIC, as accumulated totals and deltas over
/// the measurement interval.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct VnicPerformance {
    #[serde(skip_serializing_if = "Option::is_none")]
    received_broadcast_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_broadcast_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_discarded_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_discarded_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_error_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_error_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_multicast_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_multicast_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_octets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_octets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_total_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_total_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_unicast_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    received_unicast_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_broadcast_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_broadcast_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_discarded_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_discarded_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_error_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_error_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_multicast_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_multicast_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_octets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_octets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_total_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_total_packets_delta: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_unicast_packets_accumulated: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    transmitted_unicast_packets_delta: Option<f64>,
    values_are_suspect: String,
    #[serde(rename = "vNicIdentifier")]
    vnic_identifier: String,
}

impl VnicPerformance {
    pub fn identifier(&self) -> &str {
        &self.vnic_identifier
    }

    pub fn set_received_broadcast_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.received_broadcast_packets_accumulated, "receivedBroadcastPacketsAccumulated", accumulated);
        set_once(&mut self.received_broadcast_packets_delta, "receivedBroadcastPacketsDelta", delta);
    }
    pub fn set_received_discarded_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.received_discarded_packets_accumulated, "receivedDiscardedPacketsAccumulated", accumulated);
        set_once(&mut self.received_discarded_packets_delta, "receivedDiscardedPacketsDelta", delta);
    }
    pub fn set_received_error_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.received_error_packets_accumulated, "receivedErrorPacketsAccumulated", accumulated);
        set_once(&mut self.received_error_packets_delta, "receivedErrorPacketsDelta", delta);
    }
    pub fn set_received_multicast_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.received_multicast_packets_accumulated, "receivedMulticastPacketsAccumulated", accumulated);
        set_once(&mut self.received_multicast_packets_delta, "receivedMulticastPacketsDelta", delta);
    }
    pub fn set_received_octets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.received_octets_accumulated, "receivedOctetsAccumulated", accumulated);
        set_once(&mut self.received_octets_delta, "receivedOctetsDelta", delta);
    }
    pub fn set_received_total_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.received_total_packets_accumulated, "receivedTotalPacketsAccumulated", accumulated);
        set_once(&mut self.received_total_packets_delta, "receivedTotalPacketsDelta", delta);
    }
    pub fn set_received_unicast_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.received_unicast_packets_accumulated, "receivedUnicastPacketsAccumulated", accumulated);
        set_once(&mut self.received_unicast_packets_delta, "receivedUnicastPacketsDelta", delta);
    }
    pub fn set_transmitted_broadcast_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.transmitted_broadcast_packets_accumulated, "transmittedBroadcastPacketsAccumulated", accumulated);
        set_once(&mut self.transmitted_broadcast_packets_delta, "transmittedBroadcastPacketsDelta", delta);
    }
    pub fn set_transmitted_discarded_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.transmitted_discarded_packets_accumulated, "transmittedDiscardedPacketsAccumulated", accumulated);
        set_once(&mut self.transmitted_discarded_packets_delta, "transmittedDiscardedPacketsDelta", delta);
    }
    pub fn set_transmitted_error_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.transmitted_error_packets_accumulated, "transmittedErrorPacketsAccumulated", accumulated);
        set_once(&mut self.transmitted_error_packets_delta, "transmittedErrorPacketsDelta", delta);
    }
    pub fn set_transmitted_multicast_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.transmitted_multicast_packets_accumulated, "transmittedMulticastPacketsAccumulated", accumulated);
        set_once(&mut self.transmitted_multicast_packets_delta, "transmittedMulticastPacketsDelta", delta);
    }
    pub fn set_transmitted_octets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.transmitted_octets_accumulated, "transmittedOctetsAccumulated", accumulated);
        set_once(&mut self.transmitted_octets_delta, "transmittedOctetsDelta", delta);
    }
    pub fn set_transmitted_total_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.transmitted_total_packets_accumulated, "transmittedTotalPacketsAccumulated", accumulated);
        set_once(&mut self.transmitted_total_packets_delta, "transmittedTotalPacketsDelta", delta);
    }
    pub fn set_transmitted_unicast_packets(&mut self, accumulated: f64, delta: f64) {
        set_once(&mut self.transmitted_unicast_packets_accumulated, "transmittedUnicastPacketsAccumulated", accumulated);
        set_once(&mut self.transmitted_unicast_packets_delta, "transmittedUnicastPacketsDelta", delta);
    }
}

/// Usage of a licensed feature.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct FeatureUsage {
    feature_identifier: String,
    feature_utilization: i32,
}

/// Usage of a codec.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CodecUsage {
    codec_identifier: String,
    number_in_use: i32,
}

/// A named group of custom measurements.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementGroup {
    name: String,
    array_of_fields: Vec<NameValuePair>,
}

impl MeasurementGroup {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_field(&mut self, name: &str, value: &str) {
        self.array_of_fields.push(NameValuePair::new(name, value));
    }
}

/// Receive/transmit error counters.
#[derive(Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementErrors {
    pub receive_discards: i32,
    pub receive_errors: i32,
    pub transmit_discards: i32,
    pub transmit_errors: i32,
}

/// A measurement event.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    #[serde(skip)]
    pub(crate) header: EventHeader,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional_fields: Vec<NameValuePair>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    additional_measurements: Vec<MeasurementGroup>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    codec_usage_array: Vec<CodecUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    concurrent_sessions: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    configured_entities: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    cpu_usage_array: Vec<CpuUsage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    disk_usage_array: Vec<DiskUsage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<MeasurementErrors>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    feature_usage_array: Vec<FeatureUsage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    filesystem_usage_array: Vec<FilesystemUsage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    latency_distribution: Vec<LatencyBucket>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mean_request_latency: Option<f64>,
    measurement_interval: i32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    memory_usage_array: Vec<MemoryUsage>,
    measurements_for_vf_scaling_version: SchemaVersion,
    #[serde(skip_serializing_if = "Option::is_none")]
    number_of_media_ports_in_use: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_rate: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    vnfc_scaling_metric: Option<i32>,
    #[serde(rename = "vNicUsageArray", skip_serializing_if = "Vec::is_empty")]
    vnic_usage_array: Vec<VnicPerformance>,
}

impl Measurement {
    pub(crate) fn new(header: EventHeader, measurement_interval: i32) -> Self {
        Self {
            header,
            additional_fields: Vec::new(),
            additional_measurements: Vec::new(),
            codec_usage_array: Vec::new(),
            concurrent_sessions: None,
            configured_entities: None,
            cpu_usage_array: Vec::new(),
            disk_usage_array: Vec::new(),
            errors: None,
            feature_usage_array: Vec::new(),
            filesystem_usage_array: Vec::new(),
            latency_distribution: Vec::new(),
            mean_request_latency: None,
            measurement_interval,
            memory_usage_array: Vec::new(),
            measurements_for_vf_scaling_version: MEASUREMENT_VERSION,
            number_of_media_ports_in_use: None,
            request_rate: None,
            vnfc_scaling_metric: None,
            vnic_usage_array: Vec::new(),
        }
    }

    pub fn header(&self) -> &EventHeader {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut EventHeader {
        &mut self.header
    }

    pub fn set_concurrent_sessions(&mut self, v: i32) {
        set_once(&mut self.concurrent_sessions, "concurrentSessions", v);
    }
    pub fn set_configured_entities(&mut self, v: i32) {
        set_once(&mut self.configured_entities, "configuredEntities", v);
    }
    pub fn set_mean_request_latency(&mut self, v: f64) {
        set_once(&mut self.mean_request_latency, "meanRequestLatency", v);
    }
    pub fn set_request_rate(&mut self, v: i32) {
        set_once(&mut self.request_rate, "requestRate", v);
    }
    pub fn set_vnfc_scaling_metric(&mut self, v: i32) {
        set_once(&mut self.vnfc_scaling_metric, "vnfcScalingMetric", v);
    }
    pub fn set_media_ports_in_use(&mut self, v: i32) {
        set_once(&mut self.number_of_media_ports_in_use, "numberOfMediaPortsInUse", v);
    }

    /// Set the receive/transmit error counters. Single-shot.
    pub fn set_errors(&mut self, errors: MeasurementErrors) {
        set_once(&mut self.errors, "errors", errors);
    }

    pub fn add_additional_field(&mut self, name: &str, value: &str) {
        self.additional_fields.push(NameValuePair::new(name, value));
    }

    /// Append a CPU entry; the returned reference allows the optional
    /// per-CPU breakdown to be filled in.
    pub fn add_cpu_usage(&mut self, identifier: &str, percent_usage: f64) -> &mut CpuUsage {
        self.cpu_usage_array.push(CpuUsage {
            cpu_identifier: identifier.to_string(),
            percent_usage,
            ..Default::default()
        });
        #[allow(clippy::unwrap_used)]
        self.cpu_usage_array.last_mut().unwrap()
    }

    pub fn add_disk_usage(&mut self, identifier: &str) -> &mut DiskUsage {
        self.disk_usage_array.push(DiskUsage {
            disk_identifier: identifier.to_string(),
            ..Default::default()
        });
        #[allow(clippy::unwrap_used)]
        self.disk_usage_array.last_mut().unwrap()
    }

    pub fn add_memory_usage(&mut self, identifier: &str, buffered: f64) -> &mut MemoryUsage {
        self.memory_usage_array.push(MemoryUsage {
            vm_identifier: identifier.to_string(),
            memory_buffered: buffered,
            ..Default::default()
        });
        #[allow(clippy::unwrap_used)]
        self.memory_usage_array.last_mut().unwrap()
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_filesystem_usage(
        &mut self,
        filesystem_name: &str,
        block_configured: f64,
        block_iops: f64,
        block_used: f64,
        ephemeral_configured: f64,
        ephemeral_iops: f64,
        ephemeral_used: f64,
    ) {
        self.filesystem_usage_array.push(FilesystemUsage {
            filesystem_name: filesystem_name.to_string(),
            block_configured,
            block_iops,
            block_used,
            ephemeral_configured,
            ephemeral_iops,
            ephemeral_used,
        });
    }

    pub fn add_latency_bucket(&mut self, counts_in_the_bucket: i32) -> &mut LatencyBucket {
        self.latency_distribution.push(LatencyBucket {
            counts_in_the_bucket,
            ..Default::default()
        });
        #[allow(clippy::unwrap_used)]
        self.latency_distribution.last_mut().unwrap()
    }

    pub fn add_vnic_performance(
        &mut self,
        identifier: &str,
        values_are_suspect: bool,
    ) -> &mut VnicPerformance {
        self.vnic_usage_array.push(VnicPerformance {
            vnic_identifier: identifier.to_string(),
            values_are_suspect: values_are_suspect.to_string(),
            ..Default::default()
        });
        #[allow(clippy::unwrap_used)]
        self.vnic_usage_array.last_mut().unwrap()
    }

    pub fn add_feature_usage(&mut self, identifier: &str, utilization: i32) {
        self.feature_usage_array.push(FeatureUsage {
            feature_identifier: identifier.to_string(),
            feature_utilization: utilization,
        });
    }

    pub fn add_codec_usage(&mut self, identifier: &str, number_in_use: i32) {
        self.codec_usage_array.push(CodecUsage {
            codec_identifier: identifier.to_string(),
            number_in_use,
        });
    }

    /// Start a new custom measurement group; fields are added through the
    /// returned reference.
    pub fn add_measurement_group(&mut self, name: &str) -> &mut MeasurementGroup {
        self.additional_measurements.push(MeasurementGroup {
            name: name.to_string(),
            array_of_fields: Vec::new(),
        });
        #[allow(clippy::unwrap_used)]
        self.additional_measurements.last_mut().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::common::EventDomain;
    use crate::metadata::Identity;
    use serde_json::json;

    fn measurement() -> Measurement {
        let header = EventHeader::new(
            EventDomain::Measurement,
            "vFirewallBroadcastPackets",
            "mvfs000000001",
            1,
            &Identity::for_tests(),
        );
        Measurement::new(header, 60)
    }

    #[test]
    fn minimal_measurement_serializes_interval_and_version() {
        let value = serde_json::to_value(measurement()).unwrap();
        assert_eq!(
            value,
            json!({
                "measurementInterval": 60,
                "measurementsForVfScalingVersion": 2,
            })
        );
    }

    #[test]
    fn cpu_entries_keep_insertion_order() {
        let mut m = measurement();
        m.add_cpu_usage("cpu1", 12.5).set_idle(87.5);
        m.add_cpu_usage("cpu2", 50.0);
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(
            value["cpuUsageArray"],
            json!([
                {"cpuIdentifier": "cpu1", "cpuIdle": 87.5, "percentUsage": 12.5},
                {"cpuIdentifier": "cpu2", "percentUsage": 50.0},
            ])
        );
    }

    #[test]
    fn vnic_performance_uses_schema_key_casing() {
        let mut m = measurement();
        let vnic = m.add_vnic_performance("eth0", false);
        vnic.set_received_octets(1000.0, 100.0);
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(
            value["vNicUsageArray"],
            json!([{
                "receivedOctetsAccumulated": 1000.0,
                "receivedOctetsDelta": 100.0,
                "valuesAreSuspect": "false",
                "vNicIdentifier": "eth0",
            }])
        );
    }

    #[test]
    fn scalar_setters_are_single_shot() {
        let mut m = measurement();
        m.set_request_rate(100);
        m.set_request_rate(200);
        assert_eq!(
            serde_json::to_value(&m).unwrap()["requestRate"],
            json!(100)
        );
    }

    #[test]
    fn measurement_groups_nest_fields() {
        let mut m = measurement();
        let group = m.add_measurement_group("licenses");
        group.add_field("G711AudioPort", "10");
        group.add_field("G729AudioPort", "5");
        m.set_errors(MeasurementErrors {
            receive_discards: 1,
            receive_errors: 0,
            transmit_discards: 2,
            transmit_errors: 1,
        });
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(
            value["additionalMeasurements"],
            json!([{
                "name": "licenses",
                "arrayOfFields": [
                    {"name": "G711AudioPort", "value": "10"},
                    {"name": "G729AudioPort", "value": "5"},
                ],
            }])
        );
        assert_eq!(
            value["errors"],
            json!({
                "receiveDiscards": 1,
                "receiveErrors": 0,
                "transmitDiscards": 2,
                "transmitErrors": 1,
            })
        );
    }

    #[test]
    fn filesystem_usage_is_fully_mandatory() {
        let mut m = measurement();
        m.add_filesystem_usage("/dev/vda1", 100.0, 200.0, 50.0, 10.0, 20.0, 5.0);
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(
            value["filesystemUsageArray"],
            json!([{
                "filesystemName": "/dev/vda1",
                "blockConfigured": 100.0,
                "blockIops": 200.0,
                "blockUsed": 50.0,
                "ephemeralConfigured": 10.0,
                "ephemeralIops": 20.0,
                "ephemeralUsed": 5.0,
            }])
        );
    }
}
