// Client configuration
pub const DEFAULT_API_URL: &str = "http://localhost:3000";
pub const DEFAULT_SESSION_PATH: &str = ".shop-admin/session.json";
pub const DEFAULT_SESSION_TTL_SECS: i64 = 86_400;

// Environment variables
pub const ENV_API_URL: &str = "SHOP_API_URL";
pub const ENV_SESSION_PATH: &str = "SHOP_SESSION_PATH";
pub const ENV_SESSION_TTL_SECS: &str = "SHOP_SESSION_TTL_SECS";

// Validation limits
pub const MAX_CATEGORY_NAME_LENGTH: usize = 100;
pub const MAX_CURRENCY_NAME_LENGTH: usize = 50;
pub const MAX_CURRENCY_SYMBOL_LENGTH: usize = 3;
pub const CURRENCY_CODE_LENGTH: usize = 3;

// Tree rendering
pub const TREE_INDENT: &str = "  ";
pub const TOGGLE_OPEN: char = '▾';
pub const TOGGLE_CLOSED: char = '▸';
pub const TOGGLE_PLACEHOLDER: char = ' ';

// Error messages
pub const ERR_NO_TOKEN: &str = "No token found, please log in";
pub const ERR_LOAD_CATEGORIES: &str = "Failed to load categories";
pub const ERR_CREATE_CATEGORY: &str = "Failed to create category";
pub const ERR_UPDATE_CATEGORY: &str = "Failed to update category";
pub const ERR_DELETE_CATEGORY: &str = "Failed to delete category";
pub const ERR_LOAD_CURRENCIES: &str = "Failed to load currencies";
pub const ERR_CREATE_CURRENCY: &str = "Failed to create currency";
pub const ERR_UPDATE_CURRENCY: &str = "Failed to update currency";
pub const ERR_DELETE_CURRENCY: &str = "Failed to delete currency";
pub const ERR_LOGIN: &str = "Login failed";
pub const ERR_PROFILE: &str = "Failed to load profile";
