pub mod condition;
pub mod decoder;
pub mod gene_list;
pub mod raw_record;
pub mod result_table;
pub mod treatment_filter;
