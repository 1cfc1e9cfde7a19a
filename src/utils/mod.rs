pub mod file_walking;
pub mod path_resolver;
pub mod process;
#[cfg(test)]
pub mod test_utils;
