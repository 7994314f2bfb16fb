pub mod commands;
mod log;
pub mod ux;

#[cfg(test)]
mod test_utils;
