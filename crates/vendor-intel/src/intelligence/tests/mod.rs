mod common;

mod trust;
