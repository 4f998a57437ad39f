//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub mod service_layer {
    pub const DEFAULT_SERVICE_LAYER_URL: &str = "https://your-sap-server:50000/b1s/v1";
    pub const DEFAULT_COMPANY_DB: &str = "SBODemoUS";
    /// Query parameter carrying the filter expression on list requests
    pub const FILTER_QUERY_PARAM: &str = "$filter";
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_BUSINESS_PARTNERS: PathSpec = PathSpec::get("/BusinessPartners");
    pub const PATH_BUSINESS_PARTNER_CREATE: PathSpec = PathSpec::post("/BusinessPartners");
    pub const PATH_BUSINESS_PARTNER_DELETE: PathSpec = PathSpec::delete("/BusinessPartners");
    pub const PATH_BUSINESS_PARTNER_UPDATE: PathSpec = PathSpec::patch("/BusinessPartners");
    pub const PATH_LOGIN: PathSpec = PathSpec::post("/Login");
    pub const PATH_LOGOUT: PathSpec = PathSpec::post("/Logout");
}
