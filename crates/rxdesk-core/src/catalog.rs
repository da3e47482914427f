// ── Entity catalog ──
//
// Every admin page is one row of this table. Adding an entity means adding
// a variant and its columns, filters, and form; no controller changes.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use rxdesk_api::ResourceSpec;

use crate::form::schema::{FieldKind, FieldSpec, FormSchema};
use crate::model::{Column, FilterField};
use crate::navigation::MenuSection;

/// Where filtering and paging happen for an entity's list view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    /// Load everything once; filter and page in memory.
    Client,
    /// Send filters and page to the backend on every change.
    Server,
}

/// The record field a row-level status change writes, and its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusField {
    pub field: &'static str,
    pub choices: &'static [&'static str],
}

impl StatusField {
    /// Canonical spelling of `status`, matched case-insensitively.
    pub fn normalize(&self, status: &str) -> Option<&'static str> {
        self.choices
            .iter()
            .copied()
            .find(|c| c.eq_ignore_ascii_case(status.trim()))
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "kebab-case")]
pub enum Entity {
    Products,
    Categories,
    Variants,
    PackagingUnits,
    Discounts,
    Suppliers,
    Payments,
    Orders,
    TcsRecords,
    DayCloses,
    Faqs,
    MrVisits,
}

// ── Shared choice lists ─────────────────────────────────────────────

const ACTIVE: &[&str] = &["Active", "Inactive"];
const PUBLICATION: &[&str] = &["Published", "Draft", "Archived"];
const FAQ_STATUS: &[&str] = &["Published", "Draft"];
const ORDER_STATUS: &[&str] = &["Pending", "Confirmed", "Dispatched", "Delivered", "Cancelled"];
const VISIT_STATUS: &[&str] = &["Scheduled", "Completed", "Cancelled"];
const PAYMENT_MODES: &[&str] = &["Cash", "UPI", "Bank Transfer", "Cheque"];
const MANUFACTURER_TYPES: &[&str] = &["Branded", "Generic", "OTC"];
const DISCOUNT_TYPES: &[&str] = &["Percentage", "Flat"];
const FAQ_CATEGORIES: &[&str] = &["Orders", "Payments", "Delivery", "Prescriptions", "General"];
const VISIT_PURPOSES: &[&str] = &["Product Detailing", "Sample Drop", "Order Booking", "Follow-up"];

const fn text(max_len: usize) -> FieldKind {
    FieldKind::Text { max_len }
}

const fn amount(min: f64) -> FieldKind {
    FieldKind::Number {
        min: Some(min),
        max: None,
    }
}

const fn count(min: i64) -> FieldKind {
    FieldKind::Integer { min: Some(min) }
}

impl Entity {
    pub fn spec(self) -> ResourceSpec {
        match self {
            Self::Products => ResourceSpec::new("product", "products")
                .id_field("product_id")
                .multipart()
                .import_at("upload-excel"),
            Self::Categories => ResourceSpec::new("category", "categories").plural("categories"),
            Self::Variants => ResourceSpec::new("variant", "variants"),
            Self::PackagingUnits => ResourceSpec::new("packaging unit", "packaging-units"),
            Self::Discounts => ResourceSpec::new("discount", "discounts"),
            Self::Suppliers => ResourceSpec::new("supplier", "suppliers"),
            Self::Payments => ResourceSpec::new("payment", "payments"),
            Self::Orders => ResourceSpec::new("order", "orders").id_field("order_id"),
            Self::TcsRecords => {
                ResourceSpec::new("TCS record", "tcs-records").export_at("download-excel-tcs")
            }
            Self::DayCloses => ResourceSpec::new("day close", "day-close").plural("day closes"),
            Self::Faqs => ResourceSpec::new("FAQ", "faqs"),
            Self::MrVisits => ResourceSpec::new("MR visit", "mr-visits"),
        }
    }

    /// Menu item and page title.
    pub fn title(self) -> &'static str {
        match self {
            Self::Products => "Products",
            Self::Categories => "Categories",
            Self::Variants => "Variants",
            Self::PackagingUnits => "Packaging Units",
            Self::Discounts => "Discounts",
            Self::Suppliers => "Suppliers",
            Self::Payments => "Supplier Payments",
            Self::Orders => "Orders",
            Self::TcsRecords => "TCS Records",
            Self::DayCloses => "Day Close",
            Self::Faqs => "FAQs",
            Self::MrVisits => "MR Visits",
        }
    }

    pub fn section(self) -> MenuSection {
        match self {
            Self::Products | Self::Categories | Self::Variants | Self::PackagingUnits => {
                MenuSection::Catalog
            }
            Self::Discounts => MenuSection::Promotions,
            Self::Suppliers | Self::Payments => MenuSection::Procurement,
            Self::Orders => MenuSection::Sales,
            Self::TcsRecords | Self::DayCloses => MenuSection::Accounting,
            Self::Faqs => MenuSection::Content,
            Self::MrVisits => MenuSection::FieldForce,
        }
    }

    pub fn list_mode(self) -> ListMode {
        match self {
            Self::Products | Self::Suppliers | Self::Payments | Self::Orders | Self::TcsRecords => {
                ListMode::Server
            }
            _ => ListMode::Client,
        }
    }

    pub fn status(self) -> Option<StatusField> {
        let choices = match self {
            Self::Products | Self::Categories | Self::Suppliers => ACTIVE,
            Self::Discounts => PUBLICATION,
            Self::Faqs => FAQ_STATUS,
            Self::Orders => ORDER_STATUS,
            Self::MrVisits => VISIT_STATUS,
            _ => return None,
        };
        Some(StatusField {
            field: "status",
            choices,
        })
    }

    pub fn columns(self) -> &'static [Column] {
        match self {
            Self::Products => PRODUCT_COLUMNS,
            Self::Categories => CATEGORY_COLUMNS,
            Self::Variants => VARIANT_COLUMNS,
            Self::PackagingUnits => PACKAGING_UNIT_COLUMNS,
            Self::Discounts => DISCOUNT_COLUMNS,
            Self::Suppliers => SUPPLIER_COLUMNS,
            Self::Payments => PAYMENT_COLUMNS,
            Self::Orders => ORDER_COLUMNS,
            Self::TcsRecords => TCS_COLUMNS,
            Self::DayCloses => DAY_CLOSE_COLUMNS,
            Self::Faqs => FAQ_COLUMNS,
            Self::MrVisits => MR_VISIT_COLUMNS,
        }
    }

    pub fn filters(self) -> &'static [FilterField] {
        match self {
            Self::Products => PRODUCT_FILTERS,
            Self::Categories => CATEGORY_FILTERS,
            Self::Variants => VARIANT_FILTERS,
            Self::PackagingUnits => PACKAGING_UNIT_FILTERS,
            Self::Discounts => DISCOUNT_FILTERS,
            Self::Suppliers => SUPPLIER_FILTERS,
            Self::Payments => PAYMENT_FILTERS,
            Self::Orders => ORDER_FILTERS,
            Self::TcsRecords => TCS_FILTERS,
            Self::DayCloses => DAY_CLOSE_FILTERS,
            Self::Faqs => FAQ_FILTERS,
            Self::MrVisits => MR_VISIT_FILTERS,
        }
    }

    pub fn filter(self, key: &str) -> Option<&'static FilterField> {
        self.filters().iter().find(|f| f.key == key)
    }

    pub fn form(self) -> FormSchema {
        FormSchema::new(match self {
            Self::Products => PRODUCT_FIELDS,
            Self::Categories => CATEGORY_FIELDS,
            Self::Variants => VARIANT_FIELDS,
            Self::PackagingUnits => PACKAGING_UNIT_FIELDS,
            Self::Discounts => DISCOUNT_FIELDS,
            Self::Suppliers => SUPPLIER_FIELDS,
            Self::Payments => PAYMENT_FIELDS,
            Self::Orders => ORDER_FIELDS,
            Self::TcsRecords => TCS_FIELDS,
            Self::DayCloses => DAY_CLOSE_FIELDS,
            Self::Faqs => FAQ_FIELDS,
            Self::MrVisits => MR_VISIT_FIELDS,
        })
    }
}

// ── Columns ─────────────────────────────────────────────────────────

const PRODUCT_COLUMNS: &[Column] = &[
    Column::integer("product_id", "ID"),
    Column::text("name", "Name"),
    Column::text("category.name", "Category"),
    Column::text("manufacturer_type", "Type"),
    Column::currency("mrp", "MRP"),
    Column::currency("selling_price", "Selling Price"),
    Column::text("status", "Status"),
];

const CATEGORY_COLUMNS: &[Column] = &[
    Column::integer("id", "ID"),
    Column::text("name", "Name"),
    Column::text("parent.name", "Parent"),
    Column::text("status", "Status"),
];

const VARIANT_COLUMNS: &[Column] = &[
    Column::integer("id", "ID"),
    Column::text("product.name", "Product"),
    Column::text("name", "Variant"),
    Column::integer("pack_size", "Pack Size"),
    Column::currency("price", "Price"),
    Column::text("sku", "SKU"),
];

const PACKAGING_UNIT_COLUMNS: &[Column] = &[
    Column::integer("id", "ID"),
    Column::text("name", "Name"),
    Column::text("abbreviation", "Abbreviation"),
    Column::integer("conversion_factor", "Conversion"),
];

const DISCOUNT_COLUMNS: &[Column] = &[
    Column::integer("id", "ID"),
    Column::text("name", "Name"),
    Column::text("discount_type", "Type"),
    Column::text("value", "Value"),
    Column::date("valid_from", "Valid From"),
    Column::date("valid_to", "Valid To"),
    Column::text("status", "Status"),
];

const SUPPLIER_COLUMNS: &[Column] = &[
    Column::integer("id", "ID"),
    Column::text("name", "Name"),
    Column::text("contact_person", "Contact"),
    Column::text("phone", "Phone"),
    Column::text("gstin", "GSTIN"),
    Column::text("city", "City"),
    Column::text("status", "Status"),
];

const PAYMENT_COLUMNS: &[Column] = &[
    Column::integer("id", "ID"),
    Column::text("supplier.name", "Supplier"),
    Column::date("payment_date", "Date"),
    Column::currency("amount", "Amount"),
    Column::text("payment_mode", "Mode"),
    Column::text("reference_number", "Reference"),
];

const ORDER_COLUMNS: &[Column] = &[
    Column::integer("order_id", "Order"),
    Column::text("customer_name", "Customer"),
    Column::date("order_date", "Date"),
    Column::currency("total_amount", "Total"),
    Column::text("payment_status", "Payment"),
    Column::text("status", "Status"),
];

const TCS_COLUMNS: &[Column] = &[
    Column::integer("id", "ID"),
    Column::text("supplier.name", "Supplier"),
    Column::text("invoice_number", "Invoice"),
    Column::date("invoice_date", "Invoice Date"),
    Column::currency("taxable_amount", "Taxable"),
    Column::text("tcs_rate", "Rate %"),
    Column::currency("tcs_amount", "TCS"),
];

const DAY_CLOSE_COLUMNS: &[Column] = &[
    Column::integer("id", "ID"),
    Column::date("close_date", "Date"),
    Column::currency("opening_cash", "Opening Cash"),
    Column::currency("closing_cash", "Closing Cash"),
    Column::currency("total_sales", "Sales"),
    Column::text("closed_by", "Closed By"),
];

const FAQ_COLUMNS: &[Column] = &[
    Column::integer("id", "ID"),
    Column::text("question", "Question"),
    Column::text("category", "Category"),
    Column::text("status", "Status"),
];

const MR_VISIT_COLUMNS: &[Column] = &[
    Column::integer("id", "ID"),
    Column::text("representative_name", "Representative"),
    Column::text("company", "Company"),
    Column::date("visit_date", "Visit Date"),
    Column::text("purpose", "Purpose"),
    Column::text("status", "Status"),
];

// ── Filters ─────────────────────────────────────────────────────────

const PRODUCT_FILTERS: &[FilterField] = &[
    FilterField::text("name", "Name"),
    FilterField::text("category", "Category"),
    FilterField::choice("status", "Status", ACTIVE),
];

const CATEGORY_FILTERS: &[FilterField] = &[
    FilterField::text("name", "Name"),
    FilterField::choice("status", "Status", ACTIVE),
];

const VARIANT_FILTERS: &[FilterField] = &[
    FilterField::text("product.name", "Product"),
    FilterField::text("name", "Variant"),
];

const PACKAGING_UNIT_FILTERS: &[FilterField] = &[FilterField::text("name", "Name")];

const DISCOUNT_FILTERS: &[FilterField] = &[
    FilterField::text("name", "Name"),
    FilterField::choice("status", "Status", PUBLICATION),
    FilterField::date_range("valid_from", "Valid From"),
];

const SUPPLIER_FILTERS: &[FilterField] = &[
    FilterField::text("name", "Name"),
    FilterField::text("city", "City"),
    FilterField::choice("status", "Status", ACTIVE),
];

const PAYMENT_FILTERS: &[FilterField] = &[
    FilterField::text("supplier", "Supplier"),
    FilterField::choice("payment_mode", "Mode", PAYMENT_MODES),
    FilterField::date_range("payment_date", "Date"),
];

const ORDER_FILTERS: &[FilterField] = &[
    FilterField::text("customer_name", "Customer"),
    FilterField::choice("status", "Status", ORDER_STATUS),
    FilterField::date_range("order_date", "Date"),
];

const TCS_FILTERS: &[FilterField] = &[
    FilterField::text("supplier", "Supplier"),
    FilterField::date_range("invoice_date", "Invoice Date"),
];

const DAY_CLOSE_FILTERS: &[FilterField] = &[FilterField::date_range("close_date", "Date")];

const FAQ_FILTERS: &[FilterField] = &[
    FilterField::text("question", "Question"),
    FilterField::choice("category", "Category", FAQ_CATEGORIES),
    FilterField::choice("status", "Status", FAQ_STATUS),
];

const MR_VISIT_FILTERS: &[FilterField] = &[
    FilterField::text("representative_name", "Representative"),
    FilterField::text("company", "Company"),
    FilterField::choice("status", "Status", VISIT_STATUS),
    FilterField::date_range("visit_date", "Visit Date"),
];

// ── Form schemas ────────────────────────────────────────────────────

const PRODUCT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", text(120)).required(),
    FieldSpec::new("categoryId", "Category", count(1))
        .maps_to("category_id")
        .required(),
    FieldSpec::new(
        "manufacturerType",
        "Manufacturer type",
        FieldKind::Choice(MANUFACTURER_TYPES),
    )
    .maps_to("manufacturer_type")
    .required(),
    FieldSpec::new("hsnCode", "HSN code", text(8)).maps_to("hsn_code"),
    FieldSpec::new("mrp", "MRP", amount(0.0)).required(),
    FieldSpec::new("sellingPrice", "Selling price", amount(0.0))
        .maps_to("selling_price")
        .required(),
    FieldSpec::new("tags", "Tags", FieldKind::MultiSelect),
    FieldSpec::new("description", "Description", text(2000)),
    FieldSpec::new("prescriptionRequired", "Prescription required", FieldKind::Flag)
        .maps_to("prescription_required"),
    FieldSpec::new("image", "Image", FieldKind::File),
    FieldSpec::new("status", "Status", FieldKind::Choice(ACTIVE))
        .required()
        .default_value("Active"),
];

const CATEGORY_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", text(80)).required(),
    FieldSpec::new("parentId", "Parent category", count(1)).maps_to("parent_id"),
    FieldSpec::new("description", "Description", text(500)),
    FieldSpec::new("status", "Status", FieldKind::Choice(ACTIVE))
        .required()
        .default_value("Active"),
];

const VARIANT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("productId", "Product", count(1))
        .maps_to("product_id")
        .required(),
    FieldSpec::new("name", "Variant name", text(80)).required(),
    FieldSpec::new("packSize", "Pack size", count(1))
        .maps_to("pack_size")
        .required(),
    FieldSpec::new("price", "Price", amount(0.0)).required(),
    FieldSpec::new("sku", "SKU", text(40)),
];

const PACKAGING_UNIT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", text(40)).required(),
    FieldSpec::new("abbreviation", "Abbreviation", text(10)).required(),
    FieldSpec::new("conversionFactor", "Conversion factor", count(1))
        .maps_to("conversion_factor")
        .required(),
];

const DISCOUNT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", text(80)).required(),
    FieldSpec::new("discountType", "Discount type", FieldKind::Choice(DISCOUNT_TYPES))
        .maps_to("discount_type")
        .required(),
    FieldSpec::new("value", "Value", amount(0.0)).required(),
    FieldSpec::new("maxDiscount", "Maximum discount", amount(0.0))
        .maps_to("max_discount")
        .required_when("discountType", &["Percentage"]),
    FieldSpec::new("validFrom", "Valid from", FieldKind::Date)
        .maps_to("valid_from")
        .required(),
    FieldSpec::new("validTo", "Valid to", FieldKind::Date)
        .maps_to("valid_to")
        .required(),
    FieldSpec::new("productIds", "Products", FieldKind::MultiSelect).maps_to("product_ids"),
    FieldSpec::new("status", "Status", FieldKind::Choice(PUBLICATION))
        .required()
        .default_value("Draft"),
];

const SUPPLIER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("name", "Name", text(120)).required(),
    FieldSpec::new("contactPerson", "Contact person", text(80)).maps_to("contact_person"),
    FieldSpec::new("phone", "Phone", FieldKind::Phone).required(),
    FieldSpec::new("email", "Email", FieldKind::Email),
    FieldSpec::new("gstin", "GSTIN", text(15)),
    FieldSpec::new("address", "Address", text(300)),
    FieldSpec::new("city", "City", text(60)),
    FieldSpec::new("status", "Status", FieldKind::Choice(ACTIVE))
        .required()
        .default_value("Active"),
];

const PAYMENT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("supplierId", "Supplier", count(1))
        .maps_to("supplier_id")
        .required(),
    FieldSpec::new("amount", "Amount", amount(0.01)).required(),
    FieldSpec::new("paymentDate", "Payment date", FieldKind::Date)
        .maps_to("payment_date")
        .required(),
    FieldSpec::new("paymentMode", "Payment mode", FieldKind::Choice(PAYMENT_MODES))
        .maps_to("payment_mode")
        .required(),
    FieldSpec::new("referenceNumber", "Reference number", text(60))
        .maps_to("reference_number")
        .required_when("paymentMode", &["UPI", "Bank Transfer"]),
    FieldSpec::new("chequeNumber", "Cheque number", text(20))
        .maps_to("cheque_number")
        .required_when("paymentMode", &["Cheque"]),
    FieldSpec::new("notes", "Notes", text(300)),
];

const ORDER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("status", "Status", FieldKind::Choice(ORDER_STATUS)).required(),
    FieldSpec::new("trackingNumber", "Tracking number", text(40))
        .maps_to("tracking_number")
        .required_when("status", &["Dispatched"]),
    FieldSpec::new("remarks", "Remarks", text(500)),
];

const TCS_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("supplierId", "Supplier", count(1))
        .maps_to("supplier_id")
        .required(),
    FieldSpec::new("invoiceNumber", "Invoice number", text(40))
        .maps_to("invoice_number")
        .required(),
    FieldSpec::new("invoiceDate", "Invoice date", FieldKind::Date)
        .maps_to("invoice_date")
        .required(),
    FieldSpec::new("taxableAmount", "Taxable amount", amount(0.0))
        .maps_to("taxable_amount")
        .required(),
    FieldSpec::new(
        "tcsRate",
        "TCS rate",
        FieldKind::Number {
            min: Some(0.0),
            max: Some(100.0),
        },
    )
    .maps_to("tcs_rate")
    .required(),
];

const DAY_CLOSE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("closeDate", "Close date", FieldKind::Date)
        .maps_to("close_date")
        .required(),
    FieldSpec::new("openingCash", "Opening cash", amount(0.0))
        .maps_to("opening_cash")
        .required(),
    FieldSpec::new("closingCash", "Closing cash", amount(0.0))
        .maps_to("closing_cash")
        .required(),
    FieldSpec::new("remarks", "Remarks", text(500)),
];

const FAQ_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("question", "Question", text(300)).required(),
    FieldSpec::new("answer", "Answer", text(4000)).required(),
    FieldSpec::new("category", "Category", FieldKind::Choice(FAQ_CATEGORIES)).required(),
    FieldSpec::new("status", "Status", FieldKind::Choice(FAQ_STATUS))
        .required()
        .default_value("Draft"),
];

const MR_VISIT_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("representativeName", "Representative", text(80))
        .maps_to("representative_name")
        .required(),
    FieldSpec::new("company", "Company", text(120)).required(),
    FieldSpec::new("visitDate", "Visit date", FieldKind::Date)
        .maps_to("visit_date")
        .required(),
    FieldSpec::new("purpose", "Purpose", FieldKind::Choice(VISIT_PURPOSES)).required(),
    FieldSpec::new("samplesGiven", "Samples given", count(0)).maps_to("samples_given"),
    FieldSpec::new("notes", "Notes", text(1000)),
    FieldSpec::new("status", "Status", FieldKind::Choice(VISIT_STATUS))
        .required()
        .default_value("Scheduled"),
];
