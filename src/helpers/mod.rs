pub mod xml;
pub(crate) mod zip;

#[cfg(test)]
pub(crate) mod fixture;
