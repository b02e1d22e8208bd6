mod pharmacy_dto;

pub use pharmacy_dto::{
    BulkDeleteDto, BulkDeleteResponseDto, CreatePharmacyDto, ListPharmaciesQuery, PatchPharmacyDto,
    PharmacyResponseDto, SearchPharmaciesQuery, UpdatePharmacyDto,
};
