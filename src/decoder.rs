//! Turns embedded shell links into [`LinkRecord`]s.
//!
//! Both destinations formats embed class-identified shell links. [`LinkDecoder`] decodes one
//! such object from a shared [`Parser`], optionally enriches it through the shell and applies
//! the title fallback that decides between a titled record and a separator.
//!
//! Precedence of the enriched values, strongest last:
//!
//! 1. native link data (description, arguments, icon location)
//! 2. `System.Title` of the property bag
//! 3. with an application identity: `System.Title` and the destination list title,
//!    description, logo and activation context provided by the application
//!
//! A record without enriched title falls back to the description, then the file name of the
//! target without extension, then the raw target path. When all of them are empty the entry is
//! a separator.

use std::io::Write;

use log::debug;

use crate::{
    config::{file_stem, Enrichment, KnownAppIds},
    file::Parser,
    records::LinkRecord,
    shell::{Icon, InstalledApplications, PropertyBag, ShellItem, ShellResolver},
    shelllink::{propstore::keys, ShellLink},
    Result,
};

/// Pixel size requested for package logo assets
const LOGO_SIZE: u32 = 32;

/// Mutable state of one link while it is being enriched
#[derive(Debug, Default)]
struct LinkFields {
    title: Option<String>,
    description: Option<String>,
    target_path: Option<String>,
    arguments: Option<String>,
    icon: Option<Icon>,
    is_store_application: bool,
}

/// A title resolution strategy, returns a title candidate or `None`
type TitleStrategy = fn(&LinkFields) -> Option<String>;

/// Title strategies in precedence order
const TITLE_STRATEGIES: [TitleStrategy; 4] =
    [enriched_title, description_title, target_stem_title, target_path_title];

fn enriched_title(fields: &LinkFields) -> Option<String> {
    fields.title.clone()
}

fn description_title(fields: &LinkFields) -> Option<String> {
    fields.description.clone()
}

fn target_stem_title(fields: &LinkFields) -> Option<String> {
    fields
        .target_path
        .as_deref()
        .map(file_stem)
        .map(str::to_string)
}

fn target_path_title(fields: &LinkFields) -> Option<String> {
    fields.target_path.clone()
}

/// First non-empty title of the strategies, `None` makes the entry a separator
fn resolve_title(fields: &LinkFields) -> Option<String> {
    TITLE_STRATEGIES
        .iter()
        .find_map(|strategy| strategy(fields).filter(|title| !title.is_empty()))
}

/// Decodes embedded shell links into records.
///
/// The decoder only borrows its collaborators, one instance is created per destinations file.
pub struct LinkDecoder<'a> {
    enrichment: Enrichment,
    known_app_ids: &'a KnownAppIds,
    shell: &'a dyn ShellResolver,
    installed: &'a dyn InstalledApplications,
}

impl<'a> LinkDecoder<'a> {
    /// Creates a decoder.
    ///
    /// # Arguments
    /// * `enrichment` - How links are enriched through the shell
    /// * `known_app_ids` - Executable → application identity overrides
    /// * `shell` - Shell resolver
    /// * `installed` - Store package lookup
    #[must_use]
    pub fn new(
        enrichment: Enrichment,
        known_app_ids: &'a KnownAppIds,
        shell: &'a dyn ShellResolver,
        installed: &'a dyn InstalledApplications,
    ) -> Self {
        LinkDecoder {
            enrichment,
            known_app_ids,
            shell,
            installed,
        }
    }

    /// Decodes one class-identified link object at the parser position.
    ///
    /// The object is always consumed completely. With `over_limit` set the record is discarded
    /// afterwards and `Ok(None)` is returned, so the enclosing stream stays aligned.
    ///
    /// # Arguments
    /// * `parser` - Positioned at the 16-byte class id of the object
    /// * `source` - File name of the destinations file, copied into the record
    /// * `category` - Category label of the record
    /// * `over_limit` - The category already emitted its maximum number of items
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] or [`crate::Error::OutOfBounds`] if the object is
    /// not a shell link or is damaged. The parser position is undefined afterwards and the
    /// caller must stop reading the stream.
    pub fn decode(
        &self,
        parser: &mut Parser,
        source: &str,
        category: &str,
        over_limit: bool,
    ) -> Result<Option<LinkRecord>> {
        let link = ShellLink::from_ole_stream(parser)?;
        if over_limit {
            return Ok(None);
        }

        Ok(Some(self.record(&link, source, category)))
    }

    /// Builds the record for a decoded link
    #[must_use]
    pub fn record(&self, link: &ShellLink, source: &str, category: &str) -> LinkRecord {
        let is_separator = link
            .property_store()
            .and_then(|store| store.boolean(&keys::IS_DEST_LIST_SEPARATOR))
            .unwrap_or(false);
        if is_separator {
            return LinkRecord::separator(category, source);
        }

        let icon_location = link.icon_location().filter(|location| !location.is_empty());
        let icon_index = link.icon_index();

        let mut fields = LinkFields {
            description: link
                .description
                .clone()
                .map(|description| self.indirect(&description, None).unwrap_or(description)),
            target_path: link.target_path().filter(|path| !path.is_empty()),
            arguments: link.arguments.clone(),
            icon: icon_location
                .as_deref()
                .and_then(|location| self.shell.resource_icon(location, icon_index)),
            ..LinkFields::default()
        };

        match self.enrichment {
            Enrichment::Disabled => {}
            Enrichment::IdList => {
                let icon_source = link
                    .id_list_bytes()
                    .and_then(|id_list| self.shell.item_from_id_list(id_list))
                    .and_then(|item| item.icon);
                let properties = link
                    .property_store()
                    .map(|store| store as &dyn PropertyBag);
                self.enrich(&mut fields, properties, icon_source);
            }
            Enrichment::TempFile => match self.temp_file_item(link) {
                Ok(Some(item)) => {
                    let ShellItem { icon, properties } = item;
                    self.enrich(&mut fields, properties.as_deref(), icon);
                }
                Ok(None) => debug!("{source}: no shell item for persisted link"),
                Err(error) => debug!("{source}: could not persist link for enrichment - {error}"),
            },
        }

        let Some(title) = resolve_title(&fields) else {
            return LinkRecord::separator(category, source);
        };

        debug!(
            "Retrieved jump list item from {source}: {category}/{title}: {} {}; has icon: {}",
            fields.target_path.as_deref().unwrap_or_default(),
            fields.arguments.as_deref().unwrap_or_default(),
            fields.icon.is_some()
        );

        LinkRecord {
            category: category.to_string(),
            title: Some(title),
            description: fields.description,
            target_path: fields.target_path,
            arguments: fields.arguments,
            working_directory: link.working_directory.clone(),
            icon_location,
            icon_index,
            icon: fields.icon,
            is_store_application: fields.is_store_application,
            source_file: source.to_string(),
            is_separator: false,
        }
    }

    /// Applies shell properties and the icon of the icon source item
    fn enrich(
        &self,
        fields: &mut LinkFields,
        properties: Option<&dyn PropertyBag>,
        icon_source: Option<Icon>,
    ) {
        if fields.icon.is_none() {
            fields.icon = icon_source;
        }

        let Some(properties) = properties else {
            return;
        };

        self.override_with(&mut fields.title, properties.string(&keys::TITLE), None);

        let app_id = properties.string(&keys::APP_USER_MODEL_ID).or_else(|| {
            fields
                .target_path
                .as_deref()
                .and_then(|path| self.known_app_ids.by_file_name(path))
                .map(str::to_string)
        });
        let Some(app_id) = app_id else {
            return;
        };

        let package = self.installed.package_full_name(&app_id);
        if package.is_some() {
            fields.is_store_application = true;
            fields.target_path = Some(app_id);
        }
        let package = package.as_deref();

        self.override_with(&mut fields.title, properties.string(&keys::TITLE), package);
        self.override_with(
            &mut fields.title,
            properties.string(&keys::DEST_LIST_PROVIDED_TITLE),
            package,
        );
        self.override_with(
            &mut fields.description,
            properties.string(&keys::DEST_LIST_PROVIDED_DESCRIPTION),
            package,
        );

        if let (Some(logo), true, Some(package)) = (
            properties.string(&keys::DEST_LIST_LOGO_URI),
            fields.is_store_application,
            package,
        ) {
            if self.shell.package_path(package).is_some() {
                if let Some(asset) = self.shell.package_image_asset(package, &logo, LOGO_SIZE) {
                    fields.icon = Some(Icon::File(asset));
                }
            }
        }

        if let Some(activation_context) = properties.string(&keys::ACTIVATION_CONTEXT) {
            fields.arguments = Some(activation_context);
        }
    }

    /// Replaces `slot` with the resolved `value`; an unresolvable value keeps the old one
    fn override_with(&self, slot: &mut Option<String>, value: Option<String>, package: Option<&str>) {
        if let Some(resolved) = value.and_then(|value| self.indirect(&value, package)) {
            *slot = Some(resolved);
        }
    }

    /// Resolves `@`-prefixed indirect strings through the shell, plain strings are returned
    fn indirect(&self, value: &str, package: Option<&str>) -> Option<String> {
        if value.starts_with('@') {
            self.shell
                .indirect_string(value, package)
                .filter(|resolved| !resolved.is_empty())
        } else {
            Some(value.to_string())
        }
    }

    /// Persists the link to a temporary `.lnk` file and binds a shell item to it.
    ///
    /// The file is removed when the handle drops, on every path out of this function.
    fn temp_file_item(&self, link: &ShellLink) -> Result<Option<ShellItem>> {
        let mut file = tempfile::Builder::new()
            .prefix("jumpscope-")
            .suffix(".lnk")
            .tempfile()?;
        file.write_all(link.raw())?;
        file.flush()?;

        Ok(self.shell.item_from_path(file.path()))
    }
}
