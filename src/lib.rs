#![deny(unsafe_code)]

pub mod cli;
pub mod device;
pub mod env;
pub mod opts;
pub mod simctl;
pub mod util;

use std::ffi::OsStr;

pub static NAME: &str = "simstart";

trait DuctExpressionExt {
    fn vars(self, vars: impl IntoIterator<Item = (impl AsRef<OsStr>, impl AsRef<OsStr>)>) -> Self;
}

impl DuctExpressionExt for duct::Expression {
    fn vars(
        mut self,
        vars: impl IntoIterator<Item = (impl AsRef<OsStr>, impl AsRef<OsStr>)>,
    ) -> Self {
        for (k, v) in vars {
            self = self.env(&k, &v);
        }
        self
    }
}
