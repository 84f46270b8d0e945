mod command;

pub use command::CommandRemuxer;

use std::{future::Future, path::Path};

use crate::{error::KirinukiResult, segment::AssembledStream};

/// Packages an assembled transport stream into a container file at `output`.
pub trait Remuxer {
    /// Consumes `stream` and writes the packaged result to `output`.
    ///
    /// A hard failure of the underlying tool is reported as
    /// [crate::KirinukiError::CollaboratorFailure] carrying its diagnostics.
    fn remux(
        &self,
        stream: AssembledStream,
        output: &Path,
    ) -> impl Future<Output = KirinukiResult<()>> + Send;
}
