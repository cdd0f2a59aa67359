pub mod seeds;
pub mod storage;
