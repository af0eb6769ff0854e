//! Species lists
//!
//! The built-in list covers mammals across all major orders. It contains a
//! few repeated names; they are processed again and the later result
//! replaces the earlier one.

use cdspull_common::{PullError, Result};
use std::path::Path;

/// Built-in species, in processing order
pub const DEFAULT_SPECIES: &[&str] = &[
    "Gorilla beringei",
    "Pan troglodytes",
    "Pongo pygmaeus",
    "Homo sapiens",
    "Lemur catta",
    "Panthera leo",
    "Panthera tigris",
    "Ursus arctos",
    "Canis lupus",
    "Felis catus",
    "Balaenoptera musculus",
    "Delphinus delphis",
    "Physeter macrocephalus",
    "Orcinus orca",
    "Tursiops truncatus",
    "Pteropus vampyrus",
    "Desmodus rotundus",
    "Myotis lucifugus",
    "Eonycteris spelaea",
    "Rhinolophus ferrumequinum",
    "Castor canadensis",
    "Hydrochoerus hydrochaeris",
    "Sciurus vulgaris",
    "Rattus norvegicus",
    "Cavia porcellus",
    "Equus ferus caballus",
    "Rhinoceros unicornis",
    "Tapirus terrestris",
    "Diceros bicornis",
    "Equus zebra",
    "Loxodonta africana",
    "Elephas maximus",
    "Trichechus manatus",
    "Dugong dugon",
    "Procavia capensis",
    "Orycteropus afer",
    "Dasypus novemcinctus",
    "Bradypus tridactylus",
    "Choloepus didactylus",
    "Myrmecophaga tridactyla",
    "Ornithorhynchus anatinus",
    "Tachyglossus aculeatus",
    "Macropus rufus",
    "Phascolarctos cinereus",
    "Vombatus ursinus",
    "Dendrolagus goodfellowi",
    "Sarcophilus harrisii",
    "Didelphis virginiana",
    "Monodelphis domestica",
    "Phascolosorex dorsalis",
    "Thylacinus cynocephalus",
    "Acinonyx jubatus",
    "Lynx lynx",
    "Puma concolor",
    "Leopardus pardalis",
    "Panthera onca",
    "Panthera uncia",
    "Mustela putorius furo",
    "Mephitis mephitis",
    "Procyon lotor",
    "Ailurus fulgens",
    "Enhydra lutris",
    "Odobenus rosmarus",
    "Mirounga leonina",
    "Halichoerus grypus",
    "Phoca vitulina",
    "Erinaceus europaeus",
    "Atelerix albiventris",
    "Sorex araneus",
    "Talpa europaea",
    "Condylura cristata",
    "Elephantulus rufescens",
    "Macroscelides proboscideus",
    "Solenodon paradoxus",
    "Tenrec ecaudatus",
    "Echinops telfairi",
    "Oryctolagus cuniculus",
    "Lepus europaeus",
    "Sylvilagus floridanus",
    "Ochotona princeps",
    "Camelus dromedarius",
    "Camelus bactrianus",
    "Vicugna vicugna",
    "Lama glama",
    "Bos taurus",
    "Bison bison",
    "Ovis aries",
    "Capra hircus",
    "Antilope cervicapra",
    "Gazella gazella",
    "Oryx dammah",
    "Alces alces",
    "Cervus elaphus",
    "Dama dama",
    "Giraffa camelopardalis",
    "Okapia johnstoni",
    "Hippopotamus amphibius",
    "Sus scrofa",
    "Phacochoerus africanus",
    "Dicotyles tajacu",
    "Bubalus bubalis",
    "Syncerus caffer",
    "Tragelaphus strepsiceros",
    "Taurotragus oryx",
    "Connochaetes taurinus",
    "Pantholops hodgsonii",
    "Rangifer tarandus",
    "Moschus moschiferus",
    "Capreolus capreolus",
    "Hydropotes inermis",
    "Neotragus pygmaeus",
    "Hippocamelus bisulcus",
    "Pudu puda",
    "Mazama americana",
    "Odocoileus virginianus",
    "Blastocerus dichotomus",
    "Ozotoceros bezoarticus",
    "Antilocapra americana",
    "Saiga tatarica",
    "Vicugna pacos",
    "Chinchilla lanigera",
    "Lagidium viscacia",
    "Erethizon dorsatum",
    "Coendou prehensilis",
    "Hydrochoerus isthmius",
    "Dasyprocta punctata",
    "Myocastor coypus",
    "Octodon degus",
    "Thryonomys swinderianus",
    "Petromus typicus",
    "Georychus capensis",
    "Heterocephalus glaber",
    "Spalax ehrenbergi",
    "Rattus rattus",
    "Mus musculus",
    "Peromyscus maniculatus",
    "Apodemus sylvaticus",
    "Clethrionomys glareolus",
    "Microtus arvalis",
    "Ondatra zibethicus",
    "Arvicola amphibius",
    "Lemmus lemmus",
    "Dicrostonyx torquatus",
    "Neofiber alleni",
    "Castor fiber",
    "Castor canadensis",
    "Hydromys chrysogaster",
    "Platypus australis",
    "Zaglossus bruijni",
    "Echidna hystrix",
    "Didelphis marsupialis",
    "Philander opossum",
    "Caluromys philander",
    "Monodelphis brevicaudata",
    "Thylamys elegans",
    "Dasyurus viverrinus",
    "Sminthopsis crassicaudata",
    "Antechinus stuartii",
    "Perameles nasuta",
    "Macrotis lagotis",
    "Notoryctes typhlops",
    "Vombatus hirsutus",
    "Lasiorhinus latifrons",
    "Phascolarctos cinereus",
    "Pseudocheirus peregrinus",
    "Petaurus breviceps",
    "Bettongia penicillata",
    "Aepyprymnus rufescens",
    "Dendrolagus matschiei",
    "Macropus giganteus",
    "Wallabia bicolor",
];

/// Owned copy of [`DEFAULT_SPECIES`]
pub fn default_species() -> Vec<String> {
    DEFAULT_SPECIES.iter().map(|s| s.to_string()).collect()
}

/// Parse a species list: one name per line, `#` starts a comment line
pub fn parse_species_list(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Load a species list file
///
/// A file without any species is a configuration error.
pub fn load_species_file(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    let species = parse_species_list(&text);

    if species.is_empty() {
        return Err(PullError::config(format!(
            "Species file {} lists no species",
            path.display()
        )));
    }

    Ok(species)
}
