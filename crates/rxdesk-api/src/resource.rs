// ── Per-entity endpoint description ──
//
// The backend is inconsistent across entities: some take JSON, some
// multipart; bulk endpoints follow two naming schemes; the identifier
// field differs. All of that is captured here, once per entity, so no
// caller ever builds a URL or picks an encoding by hand.

/// How create/update bodies are encoded for an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PayloadEncoding {
    /// `application/json`, unless the payload carries a file.
    #[default]
    Json,
    /// Always `multipart/form-data`, even without a file attached.
    Multipart,
}

/// Static description of one backend resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Singular display name, used in error messages ("discount").
    pub entity: &'static str,
    plural: Option<&'static str>,
    /// Path segment under the base URL ("discounts").
    pub path: &'static str,
    /// Query parameter carrying the identifier on get/update/delete.
    pub id_field: &'static str,
    pub encoding: PayloadEncoding,
    import_path: Option<&'static str>,
    export_path: Option<&'static str>,
}

impl ResourceSpec {
    pub const fn new(entity: &'static str, path: &'static str) -> Self {
        Self {
            entity,
            plural: None,
            path,
            id_field: "id",
            encoding: PayloadEncoding::Json,
            import_path: None,
            export_path: None,
        }
    }

    /// Irregular plural ("categories"); default appends `s`.
    pub const fn plural(mut self, plural: &'static str) -> Self {
        self.plural = Some(plural);
        self
    }

    pub fn plural_label(&self) -> String {
        self.plural
            .map_or_else(|| format!("{}s", self.entity), String::from)
    }

    pub const fn id_field(mut self, id_field: &'static str) -> Self {
        self.id_field = id_field;
        self
    }

    pub const fn multipart(mut self) -> Self {
        self.encoding = PayloadEncoding::Multipart;
        self
    }

    /// Override the bulk upload path (default `<path>-upload/`).
    pub const fn import_at(mut self, path: &'static str) -> Self {
        self.import_path = Some(path);
        self
    }

    /// Override the bulk download path (default `download-excel-<path>/`).
    pub const fn export_at(mut self, path: &'static str) -> Self {
        self.export_path = Some(path);
        self
    }

    /// Collection path with trailing slash.
    pub fn collection_path(&self) -> String {
        format!("{}/", self.path.trim_matches('/'))
    }

    pub fn import_path(&self) -> String {
        self.import_path.map_or_else(
            || format!("{}-upload/", self.path.trim_matches('/')),
            |p| format!("{}/", p.trim_matches('/')),
        )
    }

    pub fn export_path(&self) -> String {
        self.export_path.map_or_else(
            || format!("download-excel-{}/", self.path.trim_matches('/')),
            |p| format!("{}/", p.trim_matches('/')),
        )
    }

    /// Default download file name when no `Content-Disposition` is sent.
    pub fn export_file_name(&self) -> String {
        format!("{}.xlsx", self.path.trim_matches('/'))
    }
}
