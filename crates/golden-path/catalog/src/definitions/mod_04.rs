//! MOD-04: Immobilie, von der Anlage bis zum Vertrieb
//!
//! Eleven phases from creating a property through the sales mandate, its
//! visibility in downstream modules and on the Kaufy website, to the
//! withdrawal of the mandate. No contracts cross a zone boundary here; the
//! downstream visibility steps are system steps.

use golden_path_types::{GoldenPathDefinition, GoldenPathResult, Step};

use super::{done, pre};

pub const MODULE_CODE: &str = "MOD-04";

pub const PORTFOLIO_ROUTE: &str = "/portal/immobilien/portfolio";
pub const DOSSIER_ROUTE: &str = "/portal/immobilien/:id";

pub fn definition() -> GoldenPathResult<GoldenPathDefinition> {
    GoldenPathDefinition::new(MODULE_CODE)
        .with_version("2.0.0")
        .with_label("Immobilie: Von Anlage bis Vertrieb")
        .with_description(
            "Lebenszyklus einer Immobilie: Anlage, Dossier-Pflege, Vermarktung, \
             Sichtbarkeit in Downstream-Modulen, optionale Kaufy-Aktivierung und Deaktivierung.",
        )
        // Phase 1
        .with_step(
            Step::action("create_property")
                .in_phase(1)
                .with_label("Immobilie anlegen")
                .at_route(PORTFOLIO_ROUTE)
                .with_precondition(pre("user_authenticated", "auth", "User muss eingeloggt sein"))
                .with_precondition(pre(
                    "tenant_exists",
                    "organizations",
                    "Tenant/Organisation muss vorhanden sein",
                ))
                .with_completion(done("property_exists", "properties", "Property-Row wurde erstellt"))
                .with_completion(done(
                    "main_unit_exists",
                    "units",
                    "MAIN-Unit wurde durch DB-Trigger erstellt",
                ))
                .with_completion(done(
                    "folder_structure_exists",
                    "storage_nodes",
                    "Ordnerstruktur wurde durch DB-Trigger erstellt",
                )),
        )?
        // Phase 2: manual data entry, never complete
        .with_step(
            Step::route("edit_dossier", "/portal/immobilien/:propertyId")
                .in_phase(2)
                .with_label("Immobilienakte bearbeiten")
                .with_precondition(pre("property_exists", "properties", "Property muss existieren")),
        )?
        // Phase 3
        .with_step(
            Step::system("mod05_visibility")
                .in_phase(3)
                .with_label("Sichtbarkeit in Mietverwaltung (MOD-05)")
                .with_downstream("MOD-05")
                .with_precondition(pre("property_exists", "properties", "Property muss existieren"))
                .with_precondition(pre("main_unit_exists", "units", "MAIN-Unit muss existieren"))
                .with_completion(done(
                    "unit_visible_in_mod05",
                    "units",
                    "Einheit erscheint in der Mietverwaltung",
                )),
        )?
        // Phase 4
        .with_step(
            Step::action("activate_sales_mandate")
                .in_phase(4)
                .with_label("Verkaufsauftrag aktivieren")
                .at_route(DOSSIER_ROUTE)
                .with_precondition(pre("property_exists", "properties", "Property muss existieren"))
                .with_completion(done(
                    "verkaufsauftrag_active",
                    "property_features",
                    "Verkaufsauftrag ist aktiv",
                ))
                .with_completion(done("listing_active", "listings", "Inserat ist aktiv"))
                .with_completion(done(
                    "partner_network_active",
                    "listing_publications",
                    "Veroeffentlichung im Partnernetzwerk ist aktiv",
                ))
                .with_completion(done(
                    "sales_mandate_consent_linked",
                    "listings",
                    "Verkaufsmandat ist mit einer Einwilligung verknuepft",
                )),
        )?
        // Phase 5
        .with_step(
            Step::system("stammdaten_contract")
                .in_phase(5)
                .with_label("Vertrag in Stammdaten sichtbar")
                .at_route("/portal/stammdaten/vertraege")
                .with_precondition(pre(
                    "sales_mandate_consent_linked",
                    "listings",
                    "Verkaufsmandat muss unterzeichnet sein",
                ))
                .with_completion(done(
                    "contract_visible",
                    "listings",
                    "Verkaufsmandat erscheint unter Vertraege",
                )),
        )?
        // Phase 6
        .with_step(
            Step::system("sales_desk_visibility")
                .in_phase(6)
                .with_label("Vertriebsauftrag im Sales Desk sichtbar")
                .at_route("/admin/sales-desk")
                .with_precondition(pre(
                    "sales_mandate_consent_linked",
                    "listings",
                    "Verkaufsmandat muss unterzeichnet sein",
                ))
                .with_precondition(pre("listing_active", "listings", "Inserat muss aktiv sein"))
                .with_completion(done(
                    "sales_desk_entry_visible",
                    "listings",
                    "Eintrag im Sales Desk sichtbar",
                )),
        )?
        // Phase 7
        .with_step(
            Step::system("mod09_katalog")
                .in_phase(7)
                .with_label("Sichtbarkeit im Partner-Katalog (MOD-09)")
                .with_downstream("MOD-09")
                .with_precondition(pre(
                    "partner_network_active",
                    "listing_publications",
                    "Veroeffentlichung im Partnernetzwerk muss aktiv sein",
                ))
                .with_completion(done(
                    "katalog_visible",
                    "listing_publications",
                    "Objekt erscheint im Katalog",
                )),
        )?
        // Phase 8
        .with_step(
            Step::system("mod08_suche")
                .in_phase(8)
                .with_label("Sichtbarkeit in Investment-Suche (MOD-08)")
                .with_downstream("MOD-08")
                .with_precondition(pre("listing_active", "listings", "Inserat muss aktiv sein"))
                .with_completion(done("suche_visible", "listings", "Objekt erscheint in der Suche")),
        )?
        // Phase 9: optional
        .with_step(
            Step::action("activate_kaufy")
                .in_phase(9)
                .with_label("Kaufy-Marktplatz aktivieren")
                .at_route(DOSSIER_ROUTE)
                .with_precondition(pre(
                    "verkaufsauftrag_active",
                    "property_features",
                    "Verkaufsauftrag muss aktiv sein",
                ))
                .with_completion(done(
                    "kaufy_sichtbarkeit_active",
                    "property_features",
                    "Kaufy-Sichtbarkeit ist aktiv",
                ))
                .with_completion(done(
                    "kaufy_publication_active",
                    "listing_publications",
                    "Veroeffentlichung auf Kaufy ist aktiv",
                )),
        )?
        // Phase 10
        .with_step(
            Step::system("kaufy_website")
                .in_phase(10)
                .with_label("Sichtbarkeit auf Kaufy-Website (Zone 3)")
                .with_downstream("ZONE-3")
                .with_precondition(pre(
                    "kaufy_publication_active",
                    "listing_publications",
                    "Veroeffentlichung auf Kaufy muss aktiv sein",
                ))
                .with_completion(done(
                    "kaufy_website_visible",
                    "listing_publications",
                    "Objekt erscheint auf der Kaufy-Website",
                )),
        )?
        // Phase 11
        .with_step(
            Step::action("deactivate_mandate")
                .in_phase(11)
                .with_label("Verkaufsauftrag deaktivieren (Widerruf)")
                .at_route(DOSSIER_ROUTE)
                .with_precondition(pre(
                    "verkaufsauftrag_active",
                    "property_features",
                    "Verkaufsauftrag muss aktuell aktiv sein",
                ))
                .with_completion(done("listing_withdrawn", "listings", "Inserat ist zurueckgezogen"))
                .with_completion(done(
                    "publications_paused",
                    "listing_publications",
                    "Alle Veroeffentlichungen sind pausiert",
                ))
                .with_completion(done(
                    "features_inactive",
                    "property_features",
                    "Alle Vertriebsfeatures sind inaktiv",
                )),
        )
}
