pub mod invoice;
pub mod invoice_counter;
pub mod invoice_line;
