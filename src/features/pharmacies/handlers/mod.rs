pub mod pharmacy_handler;

pub use pharmacy_handler::{
    __path_bulk_delete_pharmacies, __path_create_pharmacy, __path_delete_pharmacy,
    __path_get_pharmacy, __path_list_pharmacies, __path_list_pharmacies_by_district,
    __path_patch_pharmacy, __path_restore_pharmacy, __path_search_pharmacies,
    __path_soft_delete_pharmacy, __path_toggle_pharmacy_status, __path_update_pharmacy,
    bulk_delete_pharmacies, create_pharmacy, delete_pharmacy, get_pharmacy, list_pharmacies,
    list_pharmacies_by_district, patch_pharmacy, restore_pharmacy, search_pharmacies,
    soft_delete_pharmacy, toggle_pharmacy_status, update_pharmacy,
};
