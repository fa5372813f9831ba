pub mod benchmark;
pub mod box_filter;
pub mod codec;
pub mod filters;
pub mod metrics;
pub mod mode_filter;
pub mod noise;
pub mod noise_batch;
pub mod report;
pub mod roberts;
pub mod summed_area_table;
