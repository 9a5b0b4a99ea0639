pub mod yandex_disk;

pub use yandex_disk::YandexDiskStorage;
