//! Dockerfile rendering shared by the language templates.

use crate::INTERNAL_PORT;

pub(crate) struct DockerSpec<'a> {
    pub image: &'a str,
    /// Manifest copied before the install step so dependency layers cache.
    pub manifest: &'a str,
    pub install: &'a str,
    pub cmd: &'a [&'a str],
}

pub(crate) fn render(spec: &DockerSpec<'_>) -> String {
    let cmd = spec
        .cmd
        .iter()
        .map(|part| format!("\"{part}\""))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "FROM {image}\n\
         \n\
         WORKDIR /app\n\
         \n\
         COPY {manifest} ./\n\
         RUN {install}\n\
         \n\
         COPY . .\n\
         \n\
         ENV PORT={port}\n\
         EXPOSE {port}\n\
         \n\
         CMD [{cmd}]\n",
        image = spec.image,
        manifest = spec.manifest,
        install = spec.install,
        port = INTERNAL_PORT,
    )
}
